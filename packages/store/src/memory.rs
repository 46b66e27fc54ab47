use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cache::KeyValueStore;

/// In-memory KeyValueStore for testing and as a fallback when no persistent
/// storage is available.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
