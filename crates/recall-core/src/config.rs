//! Runtime configuration (spec §6.4), loaded from TOML and overridden by
//! `RECALL_*` environment variables. Every component reads its values from
//! here instead of hardcoding literals (SPEC_FULL §A.3).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub idle_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "recall.sqlite3".to_string(),
            pool_size: 20,
            idle_timeout_secs: 30,
            connect_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub local_capacity: u64,
    pub remote_url: Option<String>,
    pub default_ttl_secs: u64,
    pub long_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            local_capacity: 10_000,
            remote_url: None,
            default_ttl_secs: 3600,
            long_ttl_secs: 86_400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model_id: String,
    pub dimension: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: "local-hash-fallback".to_string(),
            dimension: 384,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: u32,
    pub max_limit: u32,
    pub default_similarity_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            default_similarity_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub base_decay_rate: f64,
    pub access_boost: f64,
    pub archival_threshold: f64,
    pub expiration_threshold: f64,
    pub active_threshold: f64,
    pub dormant_threshold: f64,
    pub relationship_boost: f64,
    pub preservation_tags: HashSet<String>,
    pub retention_days: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            base_decay_rate: 0.01,
            access_boost: 0.1,
            archival_threshold: 0.1,
            expiration_threshold: 0.01,
            active_threshold: 0.5,
            dormant_threshold: 0.1,
            relationship_boost: 0.05,
            preservation_tags: [
                "permanent",
                "important",
                "bookmark",
                "favorite",
                "pinned",
                "preserved",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            retention_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    pub enable_async_processing: bool,
    pub enable_clustering: bool,
    pub embedding_concurrency: usize,
    pub batch_concurrency: usize,
    pub consolidation_concurrency: usize,
    pub clustering_concurrency: usize,
    pub decay_concurrency: usize,
    pub embedding_rate_per_sec: u32,
    pub decay_rate_per_min: u32,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enable_async_processing: true,
            enable_clustering: true,
            embedding_concurrency: 3,
            batch_concurrency: 2,
            consolidation_concurrency: 1,
            clustering_concurrency: 1,
            decay_concurrency: 2,
            embedding_rate_per_sec: 10,
            decay_rate_per_min: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    pub default_epsilon: f64,
    pub default_min_points: usize,
    pub min_cluster_size: usize,
    pub merge_similarity_threshold: f64,
    pub split_max_size: usize,
    pub split_min_coherence: f64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            default_epsilon: 0.3,
            default_min_points: 3,
            min_cluster_size: 2,
            merge_similarity_threshold: 0.8,
            split_max_size: 100,
            split_min_coherence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_content_bytes: usize,
    pub max_tags: usize,
    pub max_tag_length: usize,
    pub max_user_context_length: usize,
    pub compression_threshold_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: 1024 * 1024,
            max_tags: 20,
            max_tag_length: 50,
            max_user_context_length: 100,
            compression_threshold_bytes: 100 * 1024,
        }
    }
}

/// The aggregate configuration object. Built via [`RecallConfig::load`],
/// which merges a TOML file (if present) over the defaults and then
/// applies `RECALL_*` environment overrides for the handful of values
/// operators most commonly need to touch (db url, cache remote url).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub embeddings: EmbeddingConfig,
    pub search: SearchConfig,
    pub decay: DecayConfig,
    pub jobs: JobsConfig,
    pub consolidation: ConsolidationConfig,
    pub limits: LimitsConfig,
    #[serde(default = "default_true")]
    pub async_by_default: bool,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            embeddings: EmbeddingConfig::default(),
            search: SearchConfig::default(),
            decay: DecayConfig::default(),
            jobs: JobsConfig::default(),
            consolidation: ConsolidationConfig::default(),
            limits: LimitsConfig::default(),
            async_by_default: true,
        }
    }
}

impl RecallConfig {
    /// Load from a TOML file, falling back to defaults for anything the
    /// file doesn't specify, then apply environment overrides.
    pub fn load(toml_path: Option<&str>) -> Self {
        let mut cfg = match toml_path.and_then(|p| std::fs::read_to_string(p).ok()) {
            Some(raw) => toml::from_str(&raw).unwrap_or_default(),
            None => RecallConfig::default(),
        };
        cfg.apply_env_overrides();
        cfg
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("RECALL_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(url) = std::env::var("RECALL_CACHE_REMOTE_URL") {
            self.cache.remote_url = Some(url);
        }
        if let Ok(dim) = std::env::var("RECALL_EMBEDDING_DIMENSION") {
            if let Ok(dim) = dim.parse() {
                self.embeddings.dimension = dim;
            }
        }
    }
}
