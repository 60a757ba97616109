/// Crate version, re-exported for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default namespace for the cache (spec §4.2): keys are
/// `mcp:<namespace>:<identifier>`.
pub const CACHE_KEY_PREFIX: &str = "mcp";

pub const CACHE_NAMESPACE_EMBEDDINGS: &str = "embeddings";
pub const CACHE_NAMESPACE_SEARCH: &str = "search";
pub const CACHE_NAMESPACE_MEMORY: &str = "memory";

/// Maximum traversal depth accepted by `memory_traverse` (spec §4.9).
pub const MAX_TRAVERSAL_DEPTH: u32 = 5;

/// Maximum nodes a single traversal may return (spec §4.9).
pub const MAX_TRAVERSAL_NODES: u32 = 1000;

/// Default traversal wall-clock budget in milliseconds (spec §4.9, §5).
pub const DEFAULT_TRAVERSAL_TIMEOUT_MS: u64 = 5_000;

/// Retention window default before hard-delete (spec §4.10, §6.4).
pub const DEFAULT_RETENTION_DAYS: i64 = 30;
