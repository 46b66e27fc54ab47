//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each key
//! as one file under a base directory. It is used on native platforms to keep
//! the profile cache across app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>.json      # raw value
//! ```
//!
//! ## Platform data directories
//!
//! Use `dirs::data_dir()` to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/healthconnect/` |
//! | Linux | `~/.local/share/healthconnect/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\healthconnect\` |

use std::path::PathBuf;

use crate::cache::KeyValueStore;

/// Filesystem-backed KeyValueStore for native persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &std::path::Path {
        &self.base
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers; keep them from escaping the base dir.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.entry_path(key)).ok()
    }

    async fn set(&self, key: &str, value: String) {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, value) {
            tracing::warn!("Failed to write {}: {}", path.display(), e);
        }
    }

    async fn remove(&self, key: &str) {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ProfileCache;
    use crate::models::{PatientProfile, RoleProfile, User};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("healthconnect_{tag}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = temp_dir("reopen");
        let user = User {
            id: 1,
            name: "A".to_string(),
            mobile: "9999999999".to_string(),
            email: None,
            profile: RoleProfile::Patient(PatientProfile {
                city: Some("Gwalior".to_string()),
                ..Default::default()
            }),
        };

        ProfileCache::new(FileStore::new(dir.clone())).save(&user).await;

        // Re-open from same directory
        let cache = ProfileCache::new(FileStore::new(dir.clone()));
        assert!(cache.has_session().await);
        assert_eq!(cache.load().await, Some(user));

        cache.clear().await;
        assert!(!cache.has_session().await);
        // Clearing twice is fine
        cache.clear().await;

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_keys_stay_inside_base_dir() {
        let dir = temp_dir("escape");
        let store = FileStore::new(dir.clone());

        store.set("../outside", "x".to_string()).await;

        assert!(dir.join("___outside.json").exists());
        assert_eq!(store.get("../outside").await.as_deref(), Some("x"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_unusable_base_dir_skips_the_write() {
        let dir = temp_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        // A plain file where the base directory should be
        let base = dir.join("not_a_dir");
        std::fs::write(&base, "").unwrap();

        let store = FileStore::new(base.join("nested"));
        store.set("user", "x".to_string()).await;

        assert_eq!(store.get("user").await, None);
        assert!(!base.join("nested").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
