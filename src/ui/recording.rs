//! In-memory view used by controller tests.

use super::{Field, FormView, Modal, Page, PostCard, PostListView, Route, Toast};
use crate::validation::PasswordStrength;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    pub errors: HashMap<Field, String>,
    pub successes: HashMap<Field, String>,
    pub submitting: bool,
    pub submitting_history: Vec<bool>,
    pub toast: Option<Toast>,
    pub toasts_shown: usize,
    pub route: Option<Route>,
    pub strength: Option<PasswordStrength>,
    pub loading: bool,
    pub posts: Vec<PostCard>,
    pub empty_shown: bool,
    pub signed_in: Option<bool>,
    pub confirm_answer: bool,
}

impl RecordingView {
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

impl Page for RecordingView {
    fn toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
        self.toasts_shown += 1;
    }

    fn navigate(&mut self, route: Route) {
        self.route = Some(route);
    }
}

impl FormView for RecordingView {
    fn show_error(&mut self, field: Field, message: &str) {
        self.successes.remove(&field);
        self.errors.insert(field, message.to_string());
    }

    fn show_success(&mut self, field: Field, message: &str) {
        self.errors.remove(&field);
        self.successes.insert(field, message.to_string());
    }

    fn clear_error(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
        self.submitting_history.push(submitting);
    }

    fn show_password_strength(&mut self, strength: Option<PasswordStrength>) {
        self.strength = strength;
    }
}

impl PostListView for RecordingView {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn append_post(&mut self, card: &PostCard) {
        self.posts.push(card.clone());
    }

    fn show_empty(&mut self) {
        self.empty_shown = true;
    }

    fn hide_empty(&mut self) {
        self.empty_shown = false;
    }

    fn set_signed_in(&mut self, signed_in: bool) {
        self.signed_in = Some(signed_in);
    }
}

impl Modal for RecordingView {
    fn confirm(&mut self, _title: &str, _description: &str) -> bool {
        self.confirm_answer
    }
}
