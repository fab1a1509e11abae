#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

//! Client for a small community board: sign-in, registration and an
//! infinitely scrolling post list, driven through view-model traits so the
//! same controllers work behind a terminal or a test double.

pub mod api;
pub mod config;
pub mod pages;
pub mod session;
pub mod ui;
pub mod util;
pub mod validation;

pub use api::{ApiClient, ApiError, BoardApi, ErrorCode};
pub use config::Config;
pub use session::Session;
