//! # Profile cache: the locally persisted user snapshot
//!
//! The client keeps one serialized [`User`] under a fixed key so that a page
//! load can tell, without a network round-trip, whether a session probably
//! exists. The record is a read cache and a "has session" flag; it is never
//! the source of truth for authorization. All reads and writes go through the
//! [`KeyValueStore`] trait, so the same logic works against an in-memory store
//! (tests), a directory of files (desktop) or browser `localStorage` (web).
//!
//! ## [`KeyValueStore`] trait
//!
//! An async interface with three methods (`get`, `set`, `remove`) over string
//! keys and values. Implementations live in sibling modules
//! ([`crate::memory`], [`crate::file_store`], [`crate::local`]). Like the
//! browser storage it abstracts, a store never reports errors: reads of a
//! broken backend yield `None` and failed writes are dropped.
//!
//! ## [`ProfileCache`]
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`has_session`](ProfileCache::has_session) | `true` if a record exists under the key, whatever its contents. |
//! | [`load`](ProfileCache::load) | Decodes the record. A record that no longer decodes is removed and reported as absent. |
//! | [`save`](ProfileCache::save) | Serializes a [`User`] to JSON and stores it. |
//! | [`clear`](ProfileCache::clear) | Removes the record. |

use crate::models::User;

/// Fixed key the profile record is stored under.
pub const USER_KEY: &str = "user";

/// Async trait for a string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Option<String>>;
    fn set(&self, key: &str, value: String) -> impl std::future::Future<Output = ()>;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = ()>;
}

/// The persisted user snapshot on top of a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct ProfileCache<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ProfileCache<S> {
    /// Cache using the default [`USER_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, USER_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a record is present. Presence is a hint, not proof of a session.
    pub async fn has_session(&self) -> bool {
        self.store.get(&self.key).await.is_some()
    }

    pub async fn load(&self) -> Option<User> {
        let raw = self.store.get(&self.key).await?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Discarding unreadable cached profile: {}", e);
                self.store.remove(&self.key).await;
                None
            }
        }
    }

    pub async fn save(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.store.set(&self.key, json).await,
            Err(e) => tracing::warn!("Failed to serialize profile for cache: {}", e),
        }
    }

    pub async fn clear(&self) {
        self.store.remove(&self.key).await;
    }
}
