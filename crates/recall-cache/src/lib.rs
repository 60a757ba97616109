//! Two-tier cache fronting embeddings, memories, and search results
//! (spec §4.2). A single [`TwoTierCache`] interface composes a remote
//! distributed tier (preferred) with a local in-process tier (fallback
//! and mirror), grounded in the teacher's `cortex-embeddings::cache`
//! L1/L2 split.

mod key;
mod local;
mod remote;

use std::sync::Arc;
use std::time::Duration;

use recall_core::constants::{CACHE_NAMESPACE_MEMORY, CACHE_NAMESPACE_SEARCH};
use serde::{de::DeserializeOwned, Serialize};

pub use key::{hash_identifier, namespace_prefix, namespaced_key};
pub use local::LocalCache;
pub use remote::{NullBackend, RedisBackend, RemoteBackend};

/// Cache statistics for observability (spec §9: "report boolean
/// `remote_available`").
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub remote_available: bool,
    pub local_entries: u64,
}

pub struct TwoTierCache {
    remote: Arc<dyn RemoteBackend>,
    local: LocalCache,
    default_ttl: Duration,
    long_ttl: Duration,
}

impl TwoTierCache {
    pub fn new(remote: Arc<dyn RemoteBackend>, local_capacity: u64, default_ttl_secs: u64, long_ttl_secs: u64) -> Self {
        let default_ttl = Duration::from_secs(default_ttl_secs);
        Self {
            remote,
            local: LocalCache::new(local_capacity, default_ttl),
            default_ttl,
            long_ttl: Duration::from_secs(long_ttl_secs),
        }
    }

    pub fn local_only(local_capacity: u64, default_ttl_secs: u64, long_ttl_secs: u64) -> Self {
        Self::new(Arc::new(NullBackend), local_capacity, default_ttl_secs, long_ttl_secs)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            remote_available: self.remote.is_available(),
            local_entries: self.local.len(),
        }
    }

    /// Read: try remote first, then local (spec §4.2).
    pub fn get_raw(&self, namespace: &str, identifier: &str) -> Option<String> {
        let key = namespaced_key(namespace, identifier);
        if let Some(v) = self.remote.get(&key) {
            return Some(v);
        }
        self.local.get(&key)
    }

    /// Write: goes to both tiers.
    pub fn set_raw(&self, namespace: &str, identifier: &str, value: &str, long: bool) {
        let key = namespaced_key(namespace, identifier);
        let ttl = if long { self.long_ttl } else { self.default_ttl };
        self.remote.set(&key, value, ttl);
        self.local.set(&key, value);
    }

    pub fn get<T: DeserializeOwned>(&self, namespace: &str, identifier: &str) -> Option<T> {
        self.get_raw(namespace, identifier)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn set<T: Serialize>(&self, namespace: &str, identifier: &str, value: &T, long: bool) {
        if let Ok(raw) = serde_json::to_string(value) {
            self.set_raw(namespace, identifier, &raw, long);
        }
    }

    /// `invalidateMemory(id)` (spec §4.2): drop the `memory` entry and
    /// clear the entire `search` namespace, since search results may
    /// embed the changed memory.
    pub fn invalidate_memory(&self, memory_id: &str) {
        let key = namespaced_key(CACHE_NAMESPACE_MEMORY, memory_id);
        self.remote.delete(&key);
        self.local.delete(&key);
        self.clear_namespace(CACHE_NAMESPACE_SEARCH);
    }

    /// Delete every key under a namespace in both tiers.
    pub fn clear_namespace(&self, namespace: &str) {
        let prefix = namespace_prefix(namespace);
        self.remote.delete_prefix(&prefix);
        self.local.delete_prefix(&prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TwoTierCache {
        TwoTierCache::local_only(1000, 3600, 86_400)
    }

    #[test]
    fn round_trips_a_value() {
        let c = cache();
        c.set("embeddings", "abc", &vec![1.0_f32, 2.0], false);
        let got: Option<Vec<f32>> = c.get("embeddings", "abc");
        assert_eq!(got, Some(vec![1.0, 2.0]));
    }

    #[test]
    fn invalidate_memory_clears_search_namespace() {
        let c = cache();
        c.set("search", "q1", &"result-1".to_string(), false);
        c.set("memory", "m1", &"memory-1".to_string(), false);
        c.invalidate_memory("m1");
        assert_eq!(c.get::<String>("search", "q1"), None);
        assert_eq!(c.get::<String>("memory", "m1"), None);
    }

    #[test]
    fn clear_namespace_only_touches_that_namespace() {
        let c = cache();
        c.set("search", "q1", &"r".to_string(), false);
        c.set("embeddings", "e1", &"v".to_string(), false);
        c.clear_namespace("search");
        assert_eq!(c.get::<String>("search", "q1"), None);
        assert_eq!(c.get::<String>("embeddings", "e1"), Some("v".to_string()));
    }
}
