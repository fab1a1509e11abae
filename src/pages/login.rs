//! Login form controller.

use super::errors::{is_transport, login_field_error};
use super::{apply_checks, redirect_if_signed_in, FormState, SubmitOutcome};
use crate::api::{BoardApi, Credentials};
use crate::session::Session;
use crate::ui::{Field, FormView, Route, Toast};
use crate::validation;
use std::sync::Arc;

pub const SESSION_SAVE_FAILED_MESSAGE: &str = "Signed in, but the session could not be saved.";

pub struct LoginPage<V> {
    api: Arc<dyn BoardApi>,
    session: Session,
    view: V,
    state: FormState,
}

impl<V: FormView> LoginPage<V> {
    pub fn new(api: Arc<dyn BoardApi>, session: Session, view: V) -> Self {
        Self {
            api,
            session,
            view,
            state: FormState::Idle,
        }
    }

    /// Returns `true` if the page redirected because a session already exists.
    pub fn init(&mut self) -> bool {
        if redirect_if_signed_in(&self.session, &mut self.view) {
            self.state = FormState::Done;
            return true;
        }
        false
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Validate, then send the credentials.
    ///
    /// Only the email format is checked locally; the password just has to be
    /// present, so accounts created under an older policy can still sign in.
    pub async fn submit(&mut self, email: &str, password: &str) -> SubmitOutcome {
        self.state = FormState::Validating;
        let email = email.trim();

        let checks = [
            (Field::Email, validation::email(email)),
            (Field::Password, validation::required(password)),
        ];
        if !apply_checks(&mut self.view, &checks) {
            self.state = FormState::Idle;
            return SubmitOutcome::Invalid;
        }

        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        self.state = FormState::Submitting;
        self.view.set_submitting(true);
        let result = self.api.login(&credentials).await;
        self.view.set_submitting(false);

        match result {
            Ok(tokens) => {
                if let Err(e) = self.session.persist(&tokens) {
                    tracing::warn!("Failed to persist session: {e:#}");
                    self.view.toast(Toast::error(SESSION_SAVE_FAILED_MESSAGE));
                    self.state = FormState::Idle;
                    return SubmitOutcome::Failed;
                }
                tracing::info!(email = %credentials.email, "Signed in");
                self.state = FormState::Done;
                self.view.navigate(Route::PostList);
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                let target = login_field_error(&err);
                self.view.show_error(target.field, &target.message);
                if is_transport(&err) {
                    self.view.toast(Toast::error(err.user_message()));
                }
                self.state = FormState::Idle;
                SubmitOutcome::Failed
            }
        }
    }
}
