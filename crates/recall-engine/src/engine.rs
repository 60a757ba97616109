//! `MemoryEngine`: ingestion, search, listing, updates, deletes, and
//! batch variants (spec §4.8). Grounded in the teacher's
//! `cortex-memory::engine::MemoryEngine` facade that wires storage,
//! cache, and embeddings together behind one type.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use recall_cache::TwoTierCache;
use recall_core::config::RecallConfig;
use recall_core::constants::{CACHE_NAMESPACE_MEMORY, CACHE_NAMESPACE_SEARCH};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{Memory, MemoryState, MemoryType};
use recall_core::models::GraphAnalysis;
use recall_core::sanitize::{validate_content_size, validate_tags};
use recall_core::traits::{EmbeddingProvider, MemoryPredicates, MemoryStore, ScoredMemory};
use recall_decay::DecayEngine;
use recall_embeddings::EmbeddingEngine;
use recall_graph::{traverse, TraverseOptions, TraverseResult};
use recall_jobs::{JobQueue, JobTopic};
use recall_store::SqliteStore;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dto::{now, BatchStoreOutcome, DeleteTarget, ListInput, SearchInput, StoreInput, UpdateInput};

pub struct MemoryEngine {
    pub(crate) store: Arc<SqliteStore>,
    pub(crate) cache: Arc<TwoTierCache>,
    pub(crate) embeddings: Arc<EmbeddingEngine>,
    pub(crate) config: RecallConfig,
}

impl MemoryEngine {
    pub fn new(store: Arc<SqliteStore>, cache: Arc<TwoTierCache>, embeddings: Arc<EmbeddingEngine>, config: RecallConfig) -> Self {
        Self { store, cache, embeddings, config }
    }

    fn serialize_content(content: &serde_json::Value) -> String {
        if let Some(text) = content.get("text").and_then(serde_json::Value::as_str) {
            return text.to_string();
        }
        serde_json::to_string(content).unwrap_or_default()
    }

    /// `store(input, async=true)` (spec §4.8).
    pub fn store(&self, input: StoreInput) -> RecallResult<Memory> {
        if !input.memory_type.is_user_storable() {
            return Err(RecallError::InvalidParams(
                "memory_type: merged and summary are produced internally and cannot be stored directly".into(),
            ));
        }

        let tags = validate_tags(&input.tags, &self.config.limits)?;
        let serialized = Self::serialize_content(&input.content);
        validate_content_size(&serialized, &self.config.limits)?;

        let content_hash = Memory::compute_content_hash(&input.content);
        if let Some(hit) = self.store.find_by_hash(&input.user_context, &content_hash)? {
            self.store.bump_access(&[hit.id])?;
            self.cache.invalidate_memory(&hit.id.to_string());
            return self.store.get(&input.user_context, hit.id)?.ok_or_else(|| RecallError::NotFound(hit.id.to_string()));
        }

        let async_enabled = input.r#async && self.config.jobs.enable_async_processing;
        let mut content = input.content.clone();
        let mut is_compressed = false;
        let mut metadata = json!({});

        if recall_compress::should_compress(serialized.len(), self.config.limits.compression_threshold_bytes) {
            let outcome = recall_compress::compress(&input.content, recall_compress::DEFAULT_COMPRESSION_RATIO);
            content = outcome.content;
            is_compressed = true;
            metadata = json!({
                "originalSize": outcome.original_size,
                "compressedSize": outcome.compressed_size,
                "compressionRatio": outcome.compression_ratio,
                "compressionType": "adaptive",
            });
        }

        let embedding = if async_enabled {
            None
        } else {
            Some(self.embeddings.embed(&serialized)?)
        };
        let embedding_dimension = embedding.as_ref().map(|_| self.embeddings.dimension());

        let now_ts = now();
        let memory = Memory {
            id: Uuid::new_v4(),
            user_context: input.user_context.clone(),
            content,
            content_hash,
            embedding,
            embedding_dimension,
            tags,
            memory_type: input.memory_type,
            source: input.source,
            confidence: input.confidence,
            importance_score: input.importance_score,
            similarity_threshold: input.similarity_threshold,
            decay_rate: input.decay_rate,
            access_count: 0,
            parent_id: input.parent_id,
            relation_type: input.relation_type,
            cluster_id: None,
            created_at: now_ts,
            updated_at: now_ts,
            accessed_at: now_ts,
            deleted_at: None,
            last_decay_update: now_ts,
            state: MemoryState::Active,
            decay_score: 1.0,
            is_compressed,
            metadata,
        };

        self.store.insert(&memory)?;

        if async_enabled {
            let priority = (memory.importance_score * 10.0).round() as i32;
            let queue = JobQueue::new(&self.store);
            let payload = json!({"memoryId": memory.id, "content": serialized, "priority": priority});
            if let Err(e) = queue.enqueue(JobTopic::Embedding, &payload, priority) {
                warn!(memory_id = %memory.id, error = %e, "failed to enqueue embedding job");
            }
        }

        for rel in &input.relate_to {
            if let Err(e) = self.store.upsert_relation(memory.id, rel.to, rel.relation_type, rel.strength) {
                warn!(from = %memory.id, to = %rel.to, error = %e, "relate_to upsert failed (best-effort)");
            }
        }

        self.cache.set(CACHE_NAMESPACE_MEMORY, &memory.id.to_string(), &memory.id.to_string(), false);
        self.cache.clear_namespace(CACHE_NAMESPACE_SEARCH);

        Ok(memory)
    }

    /// `search(input)` (spec §4.8).
    pub fn search(&self, input: SearchInput) -> RecallResult<Vec<ScoredMemory>> {
        let threshold = input.threshold.unwrap_or(self.config.search.default_similarity_threshold);
        let limit = input.limit.unwrap_or(self.config.search.default_limit as usize).min(self.config.search.max_limit as usize);
        let cache_key = format!(
            "{}:{}:{:?}:{}:{:.3}:{}",
            input.user_context,
            input.query,
            input.memory_type,
            input.tags.join(","),
            threshold,
            limit
        );
        let cache_hash = EmbeddingEngine::content_hash(&cache_key);

        if let Some(cached) = self.cached_search(&cache_hash) {
            debug!(query = %input.query, "search cache hit");
            return Ok(cached);
        }

        let qvec = self.embeddings.embed(&input.query)?;
        let predicates = MemoryPredicates { memory_type: input.memory_type, tags: input.tags.clone() };
        let results = self.store.knn_search(&input.user_context, &qvec, &predicates, threshold, limit)?;

        let ids: Vec<Uuid> = results.iter().map(|r| r.memory.id).collect();
        if !ids.is_empty() {
            self.store.bump_access(&ids)?;
        }

        self.cache_search(&cache_hash, &results);
        Ok(results)
    }

    fn cached_search(&self, hash: &str) -> Option<Vec<ScoredMemory>> {
        let raw: Vec<(Uuid, f64)> = self.cache.get(CACHE_NAMESPACE_SEARCH, hash)?;
        let mut out = Vec::with_capacity(raw.len());
        for (id, similarity) in raw {
            // Cache stores ids; re-fetch current rows so decay/updates stay visible.
            if let Ok(Some(memory)) = self.store.get_by_id_any_context(id) {
                out.push(ScoredMemory { memory, similarity });
            }
        }
        Some(out)
    }

    fn cache_search(&self, hash: &str, results: &[ScoredMemory]) {
        let slim: Vec<(Uuid, f64)> = results.iter().map(|r| (r.memory.id, r.similarity)).collect();
        self.cache.set(CACHE_NAMESPACE_SEARCH, hash, &slim, false);
    }

    /// `list(input)` (spec §4.8): decompresses on the way out for display.
    pub fn list(&self, input: ListInput) -> RecallResult<Vec<Memory>> {
        let predicates = MemoryPredicates { memory_type: input.memory_type, tags: input.tags };
        let mut rows = self.store.list(&input.user_context, &predicates, input.limit, input.offset)?;
        for memory in &mut rows {
            if memory.is_compressed {
                if let Some(summary) = memory.content.get("text").and_then(serde_json::Value::as_str) {
                    memory.content = json!({"text": summary});
                }
                memory.is_compressed = false;
            }
        }
        Ok(rows)
    }

    /// `update(input)` (spec §4.8): whitelisted fields only.
    pub fn update(&self, input: UpdateInput) -> RecallResult<Memory> {
        let mut memory = self
            .store
            .get(&input.user_context, input.id)?
            .ok_or_else(|| RecallError::NotFound(input.id.to_string()))?;

        let mut changed_fields = Vec::new();
        if let Some(tags) = input.tags {
            memory.tags = validate_tags(&tags, &self.config.limits)?;
            changed_fields.push("tags");
        }
        if let Some(confidence) = input.confidence {
            memory.confidence = confidence;
            changed_fields.push("confidence");
        }
        if let Some(importance) = input.importance_score {
            memory.importance_score = importance;
            changed_fields.push("importance_score");
        }
        if let Some(memory_type) = input.memory_type {
            memory.memory_type = memory_type;
            changed_fields.push("memory_type");
        }
        if let Some(source) = input.source {
            memory.source = source;
            changed_fields.push("source");
        }
        if !input.preserve_timestamps {
            memory.updated_at = now();
        }

        self.store.update(&memory)?;
        if !changed_fields.is_empty() {
            if let Err(e) = self.store.record_revision(memory.id, &changed_fields) {
                warn!(memory_id = %memory.id, error = %e, "failed to record revision audit entry");
            }
        }
        self.cache.invalidate_memory(&memory.id.to_string());
        Ok(memory)
    }

    /// `delete(input)` (spec §4.8): soft-delete by id or content_hash.
    pub fn delete(&self, user_context: &str, target: DeleteTarget) -> RecallResult<bool> {
        let id = match target {
            DeleteTarget::Id(id) => Some(id),
            DeleteTarget::ContentHash(hash) => self.store.find_by_hash(user_context, &hash)?.map(|m| m.id),
        };
        let Some(id) = id else { return Ok(false) };
        self.store.soft_delete(&[id])?;
        self.cache.invalidate_memory(&id.to_string());
        Ok(true)
    }

    pub fn batch_delete(&self, ids: &[Uuid]) -> RecallResult<usize> {
        self.store.soft_delete(ids)?;
        for id in ids {
            self.cache.invalidate_memory(&id.to_string());
        }
        Ok(ids.len())
    }

    /// `batchStore(input)` (spec §4.8): partitions success/failure without
    /// aborting the batch.
    pub fn batch_store(&self, inputs: Vec<StoreInput>) -> BatchStoreOutcome {
        let mut outcome = BatchStoreOutcome::default();
        for (idx, input) in inputs.into_iter().enumerate() {
            match self.store(input) {
                Ok(memory) => outcome.succeeded.push(memory),
                Err(e) => outcome.failed.push((idx, e.to_string())),
            }
        }
        outcome
    }

    pub fn stats(&self, user_context: &str) -> RecallResult<recall_core::models::MemoryStats> {
        self.store.stats(user_context)
    }

    pub fn tags(&self, user_context: &str) -> RecallResult<std::collections::HashMap<String, u64>> {
        self.store.tag_histogram(user_context)
    }

    pub fn clusters(&self, user_context: &str) -> RecallResult<std::collections::HashMap<String, u64>> {
        self.store.cluster_histogram(user_context)
    }

    /// Combined stats/tags/clusters aggregation (spec §4.8).
    pub fn full_stats(&self, user_context: &str) -> RecallResult<crate::dto::EngineStats> {
        Ok(crate::dto::EngineStats {
            stats: self.store.stats(user_context)?,
            tags: self.store.tag_histogram(user_context)?,
            clusters: self.store.cluster_histogram(user_context)?,
        })
    }

    /// `memory_traverse` / `memory_graph_search` alias (spec §4.9, §6.1): bounded
    /// BFS/DFS over relations and optional parent links from a start node.
    pub fn traverse(&self, opts: TraverseOptions) -> RecallResult<TraverseResult> {
        traverse(self.store.as_ref(), &opts.clamp())
    }

    /// `memory_graph_analysis` (spec §4.9, §6.1): in/out degree and relation-type
    /// breakdown for a single node.
    pub fn graph_analysis(&self, user_context: &str, id: Uuid) -> RecallResult<GraphAnalysis> {
        self.store.graph_analysis(user_context, id)
    }

    /// Most-connected nodes by total relation count (spec §4.9).
    pub fn top_connectors(&self, user_context: &str, limit: usize) -> RecallResult<Vec<(Uuid, u64)>> {
        self.store.top_connectors(user_context, limit)
    }

    /// `memory_decay_status` (spec §6.1): current decay score/state for one
    /// memory, read straight off the row — decay is recomputed by the decay
    /// worker, not on read.
    pub fn decay_status(&self, user_context: &str, id: Uuid) -> RecallResult<Memory> {
        self.store.get(user_context, id)?.ok_or_else(|| RecallError::NotFound(id.to_string()))
    }

    /// `memory_preserve` (spec §4.10, §6.1): pins a memory against decay,
    /// optionally until a fixed instant.
    pub fn preserve(&self, user_context: &str, id: Uuid, until: Option<DateTime<Utc>>) -> RecallResult<Option<Memory>> {
        let decay = DecayEngine::new(self.store.as_ref(), self.config.decay.clone(), self.config.limits.clone());
        let preserved = decay.preserve_memory(user_context, id, until)?;
        if preserved.is_some() {
            self.cache.invalidate_memory(&id.to_string());
        }
        Ok(preserved)
    }

    /// `memory_health` resource (SPEC_FULL §B): db reachability, cache
    /// remote availability, queue depths, embedding provider availability.
    /// Never fails — a degraded component is reported, not propagated.
    pub fn health(&self) -> crate::dto::HealthReport {
        let database_ok = self.store.check_integrity().unwrap_or(false);
        let cache_stats = self.cache.stats();
        let queue_depths = self.store.queue_depths().unwrap_or_default();
        crate::dto::HealthReport {
            database_ok,
            cache_remote_available: cache_stats.remote_available,
            cache_local_entries: cache_stats.local_entries,
            embedding_provider: self.embeddings.name().to_string(),
            embedding_provider_available: self.embeddings.is_available(),
            queue_depths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_cache::TwoTierCache;
    use recall_embeddings::HashFallbackProvider;

    fn engine() -> MemoryEngine {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let cache = Arc::new(TwoTierCache::local_only(1000, 3600, 86_400));
        let embeddings = Arc::new(EmbeddingEngine::new(Box::new(HashFallbackProvider::new(16)), Arc::clone(&cache)).unwrap());
        MemoryEngine::new(store, cache, embeddings, RecallConfig::default())
    }

    #[test]
    fn store_dedups_on_content_hash() {
        let e = engine();
        let input = StoreInput::new("ctx", json!({"text": "hello"}), MemoryType::Fact);
        let a = e.store(input.clone()).unwrap();
        let b = e.store(input).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.access_count, 0); // bump_access doesn't mutate the in-memory struct we return
    }

    #[test]
    fn store_rejects_merged_type() {
        let e = engine();
        let input = StoreInput::new("ctx", json!({"text": "x"}), MemoryType::Merged);
        assert!(e.store(input).is_err());
    }

    #[test]
    fn search_finds_stored_memory() {
        let e = engine();
        e.store(StoreInput::new("ctx", json!({"text": "rust ownership model"}), MemoryType::Fact)).unwrap();
        let mut search = SearchInput::default();
        search.user_context = "ctx".to_string();
        search.query = "rust ownership model".to_string();
        search.threshold = Some(0.0);
        let results = e.search(search).unwrap();
        assert!(!results.is_empty());
    }

    #[test]
    fn update_applies_only_whitelisted_fields() {
        let e = engine();
        let m = e.store(StoreInput::new("ctx", json!({"text": "x"}), MemoryType::Fact)).unwrap();
        let mut update = UpdateInput::default();
        update.user_context = "ctx".to_string();
        update.id = m.id;
        update.confidence = Some(0.9);
        let updated = e.update(update).unwrap();
        assert!((updated.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn delete_by_id_soft_deletes() {
        let e = engine();
        let m = e.store(StoreInput::new("ctx", json!({"text": "x"}), MemoryType::Fact)).unwrap();
        assert!(e.delete("ctx", DeleteTarget::Id(m.id)).unwrap());
        assert!(e.store.get("ctx", m.id).unwrap().is_none());
    }
}
