//! Local in-process tier, grounded in the teacher's
//! `cortex-embeddings/src/cache/l1_memory.rs` (moka, TTL-bounded).

use std::time::Duration;

use dashmap::DashSet;
use moka::sync::Cache;

/// Local moka-backed cache storing raw JSON strings per key, plus a side
/// index of live keys per namespace so `clear_namespace` doesn't need to
/// scan moka internals.
pub struct LocalCache {
    entries: Cache<String, String>,
    namespace_keys: DashSet<String>,
}

impl LocalCache {
    pub fn new(max_entries: u64, default_ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(default_ttl)
            .build();
        Self {
            entries,
            namespace_keys: DashSet::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key)
    }

    pub fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.namespace_keys.insert(key.to_string());
    }

    pub fn delete(&self, key: &str) {
        self.entries.invalidate(key);
        self.namespace_keys.remove(key);
    }

    /// Remove every key with the given prefix.
    pub fn delete_prefix(&self, prefix: &str) {
        let matching: Vec<String> = self
            .namespace_keys
            .iter()
            .filter(|k| k.starts_with(prefix))
            .map(|k| k.clone())
            .collect();
        for key in matching {
            self.delete(&key);
        }
    }

    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
