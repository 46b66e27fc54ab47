//! # localStorage key-value store: browser-side persistence
//!
//! [`LocalStore`] is the [`KeyValueStore`] implementation used on the **web
//! platform**. It writes into the page origin's `window.localStorage` through
//! `web-sys`.
//!
//! ## Keys
//!
//! Keys are stored verbatim, optionally behind a prefix (`"<prefix>:<key>"`) so
//! that several apps served from one origin do not collide. With no prefix the
//! profile lives under plain `"user"`.
//!
//! ## Error handling
//!
//! All trait methods silently swallow errors (returning `None` for reads, doing
//! nothing for writes). Storage can be unavailable (private browsing, quota,
//! disabled by policy); in that case the client simply behaves as if no
//! session had ever been cached.

use web_sys::Storage;

use crate::cache::KeyValueStore;

/// `window.localStorage`-backed KeyValueStore for the web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStore {
    prefix: Option<String>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store every key as `"<prefix>:<key>"`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }

    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(&self.full_key(key)).ok()?
    }

    async fn set(&self, key: &str, value: String) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if storage.set_item(&self.full_key(key), &value).is_err() {
            tracing::warn!("localStorage rejected write for {}", key);
        }
    }

    async fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(&self.full_key(key));
        }
    }
}
