use crate::domain::CacheKey;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Key-value store holding serialized post lists. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// An in-memory write cannot fail, so this always reports success.
    pub fn put(&self, key: CacheKey, value: String) -> bool {
        self.entries.write().insert(key, value);
        true
    }

    /// Removes `key`; yields whether it was present.
    pub fn delete(&self, key: &CacheKey) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// A copy of every entry.
    pub fn snapshot(&self) -> HashMap<CacheKey, String> {
        self.entries.read().clone()
    }
}
