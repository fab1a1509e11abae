use crate::validation::{FileRules, DEFAULT_ALLOWED_TYPES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default API origin + base path.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default request timeout: 10 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default posts per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Profile images are capped at 5 MiB.
pub const DEFAULT_MAX_PROFILE_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Top-level configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub board: BoardConfig,
    pub upload: UploadConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Relative endpoints are appended to this; absolute URLs bypass it.
    pub base_url: String,
    /// Whole-request deadline (send + body), in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub page_size: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_profile_image_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_profile_image_bytes: DEFAULT_MAX_PROFILE_IMAGE_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

impl UploadConfig {
    pub fn profile_image_rules(&self) -> FileRules {
        FileRules {
            max_size: self.max_profile_image_bytes,
            allowed_types: self.allowed_types.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session file; defaults to `<data dir>/session.json`.
    pub session_path: Option<PathBuf>,
}
