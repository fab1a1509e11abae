//! Configuration loading.
//!
//! Resolution order: explicit `--config` path, then
//! `<config dir>/config.toml` from the platform project directories, then
//! built-in defaults. `BOARD_API_URL` and `BOARD_TIMEOUT_SECS` override
//! whatever the file says.

pub mod schema;

pub use schema::{ApiConfig, BoardConfig, Config, StorageConfig, UploadConfig};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "board")
}

/// Platform default location of `config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Load from `path` (must exist) or from the default location (may be
    /// absent), then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `lookup` is injected so tests do not touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BOARD_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("BOARD_TIMEOUT_SECS") {
            self.api.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("BOARD_TIMEOUT_SECS is not a number: {raw}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            bail!("api.base_url cannot be empty");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be greater than zero");
        }
        if self.board.page_size == 0 {
            bail!("board.page_size must be greater than zero");
        }
        if self.upload.allowed_types.is_empty() {
            bail!("upload.allowed_types cannot be empty");
        }
        Ok(())
    }

    /// Where the session file lives.
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.session_path {
            return Ok(path.clone());
        }
        let dirs = project_dirs().context("could not determine a data directory")?;
        Ok(dirs.data_dir().join(SESSION_FILE))
    }
}
