//! Remote distributed tier. Preferred over the local tier when
//! configured (spec §4.2); degrades silently to local-only when
//! unreachable (spec §9). Backed by Redis, the idiom used by sibling
//! memory-service crates for this exact role (grounded via the retrieval
//! pack's `zircote-subcog` / `marlonsc-mcb` manifests, which pull in
//! `redis` with the `connection-manager` feature for a shared cache
//! client).

use std::sync::Mutex;
use std::time::Duration;

use redis::Commands;
use tracing::warn;

/// Seam for the distributed cache tier so tests and local-only
/// deployments can swap in a no-op implementation.
pub trait RemoteBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, ttl: Duration);
    fn delete(&self, key: &str);
    fn delete_prefix(&self, prefix: &str);
    fn is_available(&self) -> bool;
}

/// No remote configured — every operation is a silent no-op.
pub struct NullBackend;

impl RemoteBackend for NullBackend {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
    fn set(&self, _key: &str, _value: &str, _ttl: Duration) {}
    fn delete(&self, _key: &str) {}
    fn delete_prefix(&self, _prefix: &str) {}
    fn is_available(&self) -> bool {
        false
    }
}

/// Redis-backed remote tier. Connection failures are swallowed and
/// logged — the cache must never turn a connectivity blip into a
/// request failure (spec §9: "report boolean `remote_available` in
/// stats").
pub struct RedisBackend {
    client: redis::Client,
    conn: Mutex<Option<redis::Connection>>,
}

impl RedisBackend {
    /// Returns `None` on a malformed URL rather than panicking — a bad
    /// config value degrades the remote tier the same way a connection
    /// failure does, it does not take the process down.
    pub fn new(url: &str) -> Option<Self> {
        match redis::Client::open(url) {
            Ok(client) => Some(Self {
                client,
                conn: Mutex::new(None),
            }),
            Err(e) => {
                warn!(error = %e, "invalid redis url, remote cache tier disabled");
                None
            }
        }
    }

    fn with_conn<R>(&self, f: impl FnOnce(&mut redis::Connection) -> redis::RedisResult<R>) -> Option<R> {
        let mut guard = self.conn.lock().ok()?;
        if guard.is_none() {
            match self.client.get_connection() {
                Ok(c) => *guard = Some(c),
                Err(e) => {
                    warn!(error = %e, "redis connection failed");
                    return None;
                }
            }
        }
        let conn = guard.as_mut()?;
        match f(conn) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "redis operation failed");
                *guard = None;
                None
            }
        }
    }
}

impl RemoteBackend for RedisBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.with_conn(|c| c.get::<_, Option<String>>(key)).flatten()
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        let ttl_secs = ttl.as_secs().max(1);
        self.with_conn(|c| c.set_ex::<_, _, ()>(key, value, ttl_secs));
    }

    fn delete(&self, key: &str) {
        self.with_conn(|c| c.del::<_, ()>(key));
    }

    fn delete_prefix(&self, prefix: &str) {
        let pattern = format!("{prefix}*");
        let keys: Option<Vec<String>> = self.with_conn(|c| c.keys(&pattern));
        if let Some(keys) = keys {
            if !keys.is_empty() {
                self.with_conn(|c| c.del::<_, ()>(keys.clone()));
            }
        }
    }

    fn is_available(&self) -> bool {
        self.with_conn(|c| redis::cmd("PING").query::<String>(c)).is_some()
    }
}
