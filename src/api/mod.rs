//! Board REST API access.
//!
//! Provides:
//! - [`ApiClient`]: the single request path (base URL resolution, bearer
//!   token, JSON/multipart bodies, timeout, response normalization)
//! - [`BoardApi`]: the typed operations page controllers depend on
//! - [`ApiError`] / [`ErrorCode`]: the failure taxonomy

pub mod client;
pub mod error;
pub mod models;

pub use client::{interpret_response, ApiClient, RequestBody, RequestOptions};
pub use error::{ApiError, ErrorCode};
pub use models::{
    Availability, Credentials, PostAuthor, PostPage, PostSummary, ProfileImage, RegistrationForm,
    TokenPair,
};

use async_trait::async_trait;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const SIGNUP_ENDPOINT: &str = "/users/signup";
pub const POSTS_ENDPOINT: &str = "/posts";
pub const CHECK_EMAIL_ENDPOINT: &str = "/users/check-email";
pub const CHECK_NICKNAME_ENDPOINT: &str = "/users/check-nickname";

/// Typed board operations. Controllers hold a `&dyn BoardApi` so tests can
/// substitute a scripted implementation.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// `POST /auth/login` with a JSON body.
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError>;

    /// `POST /users/signup` as multipart (`email`, `password`, `nickname`,
    /// optional `profile_image`).
    async fn signup(&self, form: &RegistrationForm) -> Result<TokenPair, ApiError>;

    /// `GET /posts?page&size`.
    async fn list_posts(&self, page: u32, size: u32) -> Result<PostPage, ApiError>;

    /// Whether `email` is still free to register.
    async fn check_email(&self, email: &str) -> Result<bool, ApiError>;

    /// Whether `nickname` is still free to register.
    async fn check_nickname(&self, nickname: &str) -> Result<bool, ApiError>;
}
