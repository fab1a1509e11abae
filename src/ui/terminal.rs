//! Console rendering of the page views.

use super::{Field, FormView, Modal, Page, PostCard, PostListView, Route, Toast, ToastKind};
use crate::validation::PasswordStrength;
use console::{style, Term};

/// Terminal-backed view. Output is best effort: a closed stdout never
/// aborts a page flow.
pub struct TerminalView {
    term: Term,
    /// Whether the last printed line is a toast that the next toast replaces.
    toast_on_screen: bool,
    route: Option<Route>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::with_term(Term::stdout())
    }

    pub fn with_term(term: Term) -> Self {
        Self {
            term,
            toast_on_screen: false,
            route: None,
        }
    }

    /// Where the last controller asked to go, if anywhere.
    pub fn route(&self) -> Option<Route> {
        self.route
    }

    fn line(&mut self, text: &str) {
        let _ = self.term.write_line(text);
        self.toast_on_screen = false;
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for TerminalView {
    fn toast(&mut self, toast: Toast) {
        if self.toast_on_screen && self.term.is_term() {
            let _ = self.term.clear_last_lines(1);
        }
        let badge = match toast.kind {
            ToastKind::Info => style(" INFO ").on_blue().white(),
            ToastKind::Success => style(" DONE ").on_green().black(),
            ToastKind::Warning => style(" WARN ").on_yellow().black(),
            ToastKind::Error => style(" FAIL ").on_red().white(),
        };
        self.line(&format!("{} {}", badge.bold(), toast.message));
        self.toast_on_screen = !toast.is_sticky();
    }

    fn navigate(&mut self, route: Route) {
        tracing::debug!(path = %route.path(), "navigate");
        self.route = Some(route);
    }
}

impl FormView for TerminalView {
    fn show_error(&mut self, field: Field, message: &str) {
        self.line(&format!(
            "  {} {}: {}",
            style("✗").red().bold(),
            style(field).bold(),
            style(message).red()
        ));
    }

    fn show_success(&mut self, field: Field, message: &str) {
        self.line(&format!(
            "  {} {}: {}",
            style("✓").green().bold(),
            style(field).bold(),
            style(message).green()
        ));
    }

    fn clear_error(&mut self, _field: Field) {}

    fn set_submitting(&mut self, submitting: bool) {
        if submitting {
            self.line(&style("Submitting…").dim().to_string());
        }
    }

    fn show_password_strength(&mut self, strength: Option<PasswordStrength>) {
        let Some(strength) = strength else {
            return;
        };
        let label = match strength {
            PasswordStrength::Weak => style(strength.label()).red(),
            PasswordStrength::Medium => style(strength.label()).yellow(),
            PasswordStrength::Strong => style(strength.label()).green(),
        };
        self.line(&format!("  password strength: {label}"));
    }
}

impl PostListView for TerminalView {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.line(&style("Loading posts…").dim().to_string());
        }
    }

    fn append_post(&mut self, card: &PostCard) {
        self.line(&format!(
            "{} {}",
            style(format!("#{}", card.id)).dim(),
            style(&card.title).bold()
        ));
        self.line(&format!(
            "    ♥ {}  💬 {}  👁 {}   {} · {}",
            card.likes,
            card.comments,
            card.views,
            style(&card.author).cyan(),
            style(&card.created_at).dim()
        ));
    }

    fn show_empty(&mut self) {
        self.line(&style("No posts yet.").dim().to_string());
    }

    fn hide_empty(&mut self) {}

    fn set_signed_in(&mut self, signed_in: bool) {
        if !signed_in {
            self.line(&style("Browsing as guest.").dim().to_string());
        }
    }
}

impl Modal for TerminalView {
    fn confirm(&mut self, title: &str, description: &str) -> bool {
        self.line(&style(title).bold().to_string());
        dialoguer::Confirm::new()
            .with_prompt(description)
            .default(false)
            .interact_on(&self.term)
            .unwrap_or(false)
    }
}
