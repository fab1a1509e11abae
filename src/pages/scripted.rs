//! Scripted `BoardApi` for controller tests.

use crate::api::{ApiError, BoardApi, Credentials, PostPage, RegistrationForm, TokenPair};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub(crate) struct ScriptedApi {
    pub login: Mutex<Option<Result<TokenPair, ApiError>>>,
    pub signup: Mutex<Option<Result<TokenPair, ApiError>>>,
    pub pages: Mutex<VecDeque<Result<PostPage, ApiError>>>,
    pub email_available: Mutex<Option<Result<bool, ApiError>>>,
    pub nickname_available: Mutex<Option<Result<bool, ApiError>>>,
    pub calls: AtomicUsize,
    pub page_requests: Mutex<Vec<(u32, u32)>>,
    pub last_signup: Mutex<Option<RegistrationForm>>,
}

pub(crate) fn tokens() -> TokenPair {
    TokenPair {
        access_token: "access-1".into(),
        refresh_token: "refresh-1".into(),
    }
}

fn unscripted() -> ApiError {
    ApiError::Network("unscripted call".into())
}

impl ScriptedApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BoardApi for ScriptedApi {
    async fn login(&self, _credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.login.lock().take().unwrap_or_else(|| Err(unscripted()))
    }

    async fn signup(&self, form: &RegistrationForm) -> Result<TokenPair, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_signup.lock() = Some(form.clone());
        self.signup.lock().take().unwrap_or_else(|| Err(unscripted()))
    }

    async fn list_posts(&self, page: u32, size: u32) -> Result<PostPage, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.page_requests.lock().push((page, size));
        self.pages
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn check_email(&self, _email: &str) -> Result<bool, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.email_available.lock().clone().unwrap_or(Ok(true))
    }

    async fn check_nickname(&self, _nickname: &str) -> Result<bool, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.nickname_available.lock().clone().unwrap_or(Ok(true))
    }
}
