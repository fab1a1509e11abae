//! Client session: the persisted token pair.
//!
//! A [`Session`] is created once at startup and handed to the API client
//! and to every page controller. It is the only place tokens live.
//!
//! ## Design
//! - [`TokenStore`] is a flat string key/value store; the session owns the
//!   key names (`access_token`, `refresh_token`)
//! - [`FileTokenStore`] persists to a JSON object on disk
//! - [`MemoryTokenStore`] backs tests and ephemeral runs
//! - No client-side expiry: a stored pair counts as signed in until
//!   [`Session::clear`] is called

pub mod store;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use crate::api::TokenPair;
use anyhow::Result;
use std::sync::Arc;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// The stored pair, if both halves are present.
    pub fn tokens(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens().is_some()
    }

    /// Persist a freshly issued pair, replacing any previous one.
    ///
    /// If the refresh token cannot be stored the access token is removed
    /// again, so a failed call never leaves half a pair behind.
    pub fn persist(&self, tokens: &TokenPair) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        if let Err(e) = self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token) {
            if let Err(undo) = self.store.remove(ACCESS_TOKEN_KEY) {
                tracing::warn!("Could not roll back access token: {undo}");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Forget both tokens.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
