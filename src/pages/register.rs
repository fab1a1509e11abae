//! Registration form controller.
//!
//! Besides `submit`, the page reacts to individual inputs: email and
//! nickname are checked for availability on blur, the password drives a
//! strength meter and a live confirmation check, and a picked profile
//! image is checked against the upload rules before it is kept.

use super::errors::{
    is_transport, register_field_error, EMAIL_TAKEN_MESSAGE, NICKNAME_TAKEN_MESSAGE,
};
use super::{apply_checks, redirect_if_signed_in, FormState, SubmitOutcome};
use crate::api::{BoardApi, ProfileImage, RegistrationForm};
use crate::session::Session;
use crate::ui::{Field, FormView, Route, Toast};
use crate::validation::{self, FileRules};
use std::sync::Arc;

pub const WELCOME_MESSAGE: &str = "Welcome! Your account has been created.";
pub const EMAIL_AVAILABLE_MESSAGE: &str = "This email is available.";
pub const NICKNAME_AVAILABLE_MESSAGE: &str = "This nickname is available.";
pub const PASSWORDS_MATCH_MESSAGE: &str = "Passwords match.";
pub const AVAILABILITY_FAILED_MESSAGE: &str = "Could not check availability. Please try again.";
const SESSION_SAVE_FAILED_MESSAGE: &str = "Account created, but the session could not be saved.";

pub struct RegisterPage<V> {
    api: Arc<dyn BoardApi>,
    session: Session,
    view: V,
    state: FormState,
    image_rules: FileRules,
    profile_image: Option<ProfileImage>,
}

impl<V: FormView> RegisterPage<V> {
    pub fn new(api: Arc<dyn BoardApi>, session: Session, view: V, image_rules: FileRules) -> Self {
        Self {
            api,
            session,
            view,
            state: FormState::Idle,
            image_rules,
            profile_image: None,
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

    pub fn profile_image(&self) -> Option<&ProfileImage> {
        self.profile_image.as_ref()
    }

    // ── Field handlers ───────────────────────────────────────────

    /// Format check, then availability. Returns whether the email is usable.
    pub async fn on_email_blur(&mut self, email: &str) -> bool {
        let email = email.trim();
        let result = validation::email(email);
        if !result.valid {
            self.view.show_error(Field::Email, result.message());
            return false;
        }
        match self.api.check_email(email).await {
            Ok(true) => {
                self.view.show_success(Field::Email, EMAIL_AVAILABLE_MESSAGE);
                true
            }
            Ok(false) => {
                self.view.show_error(Field::Email, EMAIL_TAKEN_MESSAGE);
                false
            }
            Err(e) => {
                tracing::warn!("Email availability check failed: {e}");
                self.view.show_error(Field::Email, AVAILABILITY_FAILED_MESSAGE);
                false
            }
        }
    }

    /// Length check, then availability. Returns whether the nickname is usable.
    pub async fn on_nickname_blur(&mut self, nickname: &str) -> bool {
        let nickname = nickname.trim();
        let result = validation::nickname(nickname);
        if !result.valid {
            self.view.show_error(Field::Nickname, result.message());
            return false;
        }
        match self.api.check_nickname(nickname).await {
            Ok(true) => {
                self.view
                    .show_success(Field::Nickname, NICKNAME_AVAILABLE_MESSAGE);
                true
            }
            Ok(false) => {
                self.view.show_error(Field::Nickname, NICKNAME_TAKEN_MESSAGE);
                false
            }
            Err(e) => {
                tracing::warn!("Nickname availability check failed: {e}");
                self.view
                    .show_error(Field::Nickname, AVAILABILITY_FAILED_MESSAGE);
                false
            }
        }
    }

    pub fn on_password_input(&mut self, password: &str, confirm: &str) {
        let strength = (!password.is_empty()).then(|| validation::password_strength(password));
        self.view.show_password_strength(strength);
        if !confirm.is_empty() {
            self.on_password_confirm_input(password, confirm);
        }
    }

    pub fn on_password_confirm_input(&mut self, password: &str, confirm: &str) {
        if confirm.is_empty() {
            self.view.clear_error(Field::PasswordConfirm);
            return;
        }
        let result = validation::password_match(password, confirm);
        if result.valid {
            self.view
                .show_success(Field::PasswordConfirm, PASSWORDS_MATCH_MESSAGE);
        } else {
            self.view
                .show_error(Field::PasswordConfirm, result.message());
        }
    }

    /// Keep `image` if it passes the upload rules. `None` clears the selection.
    pub fn on_profile_image_selected(&mut self, image: Option<ProfileImage>) -> bool {
        let Some(image) = image else {
            self.profile_image = None;
            self.view.clear_error(Field::ProfileImage);
            return true;
        };
        let result = validation::file(Some(&image.meta()), &self.image_rules);
        if !result.valid {
            self.profile_image = None;
            self.view.show_error(Field::ProfileImage, result.message());
            return false;
        }
        self.profile_image = Some(image);
        self.view.clear_error(Field::ProfileImage);
        true
    }

    // ── Submit ───────────────────────────────────────────────────

    /// Validate every field, then send the multipart signup request.
    ///
    /// An image on `form` wins over one picked earlier through
    /// [`on_profile_image_selected`](Self::on_profile_image_selected).
    pub async fn submit(&mut self, mut form: RegistrationForm) -> SubmitOutcome {
        self.state = FormState::Validating;
        form.email = form.email.trim().to_string();
        form.nickname = form.nickname.trim().to_string();
        if form.profile_image.is_none() {
            form.profile_image = self.profile_image.clone();
        }

        let image_meta = form.profile_image.as_ref().map(ProfileImage::meta);
        let checks = [
            (Field::Email, validation::email(&form.email)),
            (Field::Password, validation::password(&form.password)),
            (
                Field::PasswordConfirm,
                validation::password_match(&form.password, &form.password_confirm),
            ),
            (Field::Nickname, validation::nickname(&form.nickname)),
            (
                Field::ProfileImage,
                validation::file(image_meta.as_ref(), &self.image_rules),
            ),
        ];
        if !apply_checks(&mut self.view, &checks) {
            self.state = FormState::Idle;
            return SubmitOutcome::Invalid;
        }

        self.state = FormState::Submitting;
        self.view.set_submitting(true);
        let result = self.api.signup(&form).await;
        self.view.set_submitting(false);

        match result {
            Ok(tokens) => {
                if let Err(e) = self.session.persist(&tokens) {
                    tracing::warn!("Failed to persist session: {e:#}");
                    self.view.toast(Toast::error(SESSION_SAVE_FAILED_MESSAGE));
                    self.state = FormState::Idle;
                    return SubmitOutcome::Failed;
                }
                tracing::info!(email = %form.email, nickname = %form.nickname, "Registered");
                self.state = FormState::Done;
                self.view.toast(Toast::success(WELCOME_MESSAGE));
                self.view.navigate(Route::PostList);
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                let target = register_field_error(&err);
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
