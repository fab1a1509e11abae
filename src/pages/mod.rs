//! Page controllers.
//!
//! Each controller owns the view it was initialised with and drives it:
//! validation first, then at most one API call, then view updates or
//! navigation. Handlers take `&mut self`, so a form cannot be submitted
//! again while its request is in flight.
//!
//! ```text
//! Idle ──submit──▶ Validating ──invalid──▶ Idle
//!                      │
//!                    valid
//!                      ▼
//!                 Submitting ──failure──▶ Idle (field error shown)
//!                      │
//!                   success
//!                      ▼
//!                    Done (navigated away)
//! ```

pub mod errors;
pub mod list;
pub mod login;
pub mod register;

#[cfg(test)]
pub(crate) mod scripted;

pub use errors::{login_field_error, register_field_error, FieldError};
pub use list::PostListPage;
pub use login::LoginPage;
pub use register::RegisterPage;

use crate::session::Session;
use crate::ui::{Field, FormView, Modal, Route};
use crate::validation::ValidationResult;
use anyhow::Result;

/// Lifecycle of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Done,
}

/// What a call to `submit` ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// The server accepted the form and the page navigated away.
    Succeeded,
    /// The request failed; the error is on screen.
    Failed,
}

/// Push each check into the view (error slot or cleared) and report
/// whether all of them passed.
pub(crate) fn apply_checks<V: FormView>(
    view: &mut V,
    checks: &[(Field, ValidationResult)],
) -> bool {
    let mut valid = true;
    for (field, result) in checks {
        if result.valid {
            view.clear_error(*field);
        } else {
            view.show_error(*field, result.message());
            valid = false;
        }
    }
    valid
}

/// Redirect away from an auth page when a session already exists.
pub(crate) fn redirect_if_signed_in<V: FormView>(session: &Session, view: &mut V) -> bool {
    if session.is_authenticated() {
        view.navigate(Route::PostList);
        return true;
    }
    false
}

/// Ask for confirmation, then drop the stored token pair.
///
/// Returns whether the session was cleared. Signed-out sessions are left
/// alone without prompting.
pub fn logout<M: Modal>(session: &Session, modal: &mut M) -> Result<bool> {
    if !session.is_authenticated() {
        return Ok(false);
    }
    if !modal.confirm("Log out", "Do you want to log out?") {
        return Ok(false);
    }
    session.clear()?;
    tracing::info!("Signed out");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TokenPair;
    use crate::ui::recording::RecordingView;

    fn signed_in() -> Session {
        let session = Session::in_memory();
        session
            .persist(&TokenPair {
                access_token: "a".into(),
                refresh_token: "r".into(),
            })
            .unwrap();
        session
    }

    #[test]
    fn logout_clears_after_confirmation() {
        let session = signed_in();
        let mut modal = RecordingView {
            confirm_answer: true,
            ..Default::default()
        };
        assert!(logout(&session, &mut modal).unwrap());
        assert!(!session.is_authenticated());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn logout_declined_keeps_tokens() {
        let session = signed_in();
        let mut modal = RecordingView::default();
        assert!(!logout(&session, &mut modal).unwrap());
        assert!(session.is_authenticated());
    }

    #[test]
    fn logout_when_signed_out_is_noop() {
        let session = Session::in_memory();
        let mut modal = RecordingView {
            confirm_answer: true,
            ..Default::default()
        };
        assert!(!logout(&session, &mut modal).unwrap());
    }
}
