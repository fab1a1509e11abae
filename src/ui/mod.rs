//! View-model contracts between page controllers and whatever renders them.
//!
//! Controllers never render anything themselves. They receive a view at
//! page-init time and push state changes into it: inline field errors,
//! the submit button state, toasts and navigation. [`terminal::TerminalView`]
//! is the implementation used by the `board` binary.

pub mod terminal;
pub mod toast;

#[cfg(test)]
pub(crate) mod recording;

pub use terminal::TerminalView;
pub use toast::{Toast, ToastKind, DEFAULT_TOAST_DURATION};

use crate::validation::PasswordStrength;

// ── Fields & routes ──────────────────────────────────────────────

/// Form inputs addressable by controllers. The string names are the
/// markup contract: each field has an input and an error slot tagged with
/// the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    PasswordConfirm,
    Nickname,
    ProfileImage,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordConfirm => "passwordConfirm",
            Self::Nickname => "nickname",
            Self::ProfileImage => "profileImage",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    PostList,
    WritePost,
    PostDetail(u64),
}

impl Route {
    pub fn path(self) -> String {
        match self {
            Self::Login => "/user/login".into(),
            Self::Register => "/user/register".into(),
            Self::PostList => "/board/list".into(),
            Self::WritePost => "/board/write".into(),
            Self::PostDetail(id) => format!("/board/detail?id={id}"),
        }
    }
}

// ── View traits ──────────────────────────────────────────────────

/// Capabilities shared by every page.
pub trait Page {
    /// Show a toast, replacing any toast still on screen.
    fn toast(&mut self, toast: Toast);

    /// Leave the current page.
    fn navigate(&mut self, route: Route);
}

/// A page hosting a form.
pub trait FormView: Page {
    /// Show `message` in the field's error slot and mark the input invalid.
    /// Hides any success message for the same field.
    fn show_error(&mut self, field: Field, message: &str);

    /// Show `message` in the field's success slot. Clears the error slot.
    fn show_success(&mut self, field: Field, message: &str);

    fn clear_error(&mut self, field: Field);

    /// Disable (or re-enable) the submit control.
    fn set_submitting(&mut self, submitting: bool);

    /// Update the strength meter; `None` hides it.
    fn show_password_strength(&mut self, _strength: Option<PasswordStrength>) {}
}

/// A rendered post card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: u64,
    pub title: String,
    pub likes: String,
    pub comments: String,
    pub views: String,
    pub author: String,
    pub author_image: String,
    pub created_at: String,
}

/// The post listing page.
pub trait PostListView: Page {
    fn set_loading(&mut self, loading: bool);

    fn append_post(&mut self, card: &PostCard);

    /// Replace the list with the "no posts yet" placeholder.
    fn show_empty(&mut self);

    fn hide_empty(&mut self);

    /// Reflect whether a user is signed in (profile avatar, write button).
    fn set_signed_in(&mut self, _signed_in: bool) {}
}

/// Blocking yes/no confirmation.
pub trait Modal {
    fn confirm(&mut self, title: &str, description: &str) -> bool;
}
