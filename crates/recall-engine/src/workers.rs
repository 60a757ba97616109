//! Job handlers bridging the durable queue (C12) to the engine's actual
//! logic (spec §4.12): embedding generation, decay sweeps, clustering
//! maintenance, and consolidation strategies. Grounded in the teacher's
//! `cortex-jobs::workers` handler registrations, which wire the same kind
//! of `Arc<Engine>`-holding structs into the queue's topic map.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{Memory, MemoryState, MemoryType};
use recall_core::traits::{EmbeddingProvider, MemoryPredicates};
use recall_decay::DecayEngine;
use recall_jobs::{JobHandler, JobTopic};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dto::{now, StoreInput};
use crate::engine::MemoryEngine;

const MAX_EMBEDDING_ERROR_LEN: usize = 500;
/// Cap on how many memories a clustering maintenance pass scans at once.
/// The spec doesn't pin a number; this keeps a single job bounded.
const CLUSTER_MAINTENANCE_SCAN_LIMIT: usize = 10_000;

/// Strip control chars and escape single quotes before persisting an
/// error message to `metadata.embeddingError` (spec §4.12).
fn sanitize_error(message: &str) -> String {
    let stripped = recall_core::sanitize::strip_control_chars(message);
    stripped.replace('\'', "''").chars().take(MAX_EMBEDDING_ERROR_LEN).collect()
}

/// Builds the default handler map for [`recall_jobs::JobRunner`]: one
/// handler per topic the engine knows how to serve.
pub fn register_handlers(engine: Arc<MemoryEngine>) -> HashMap<JobTopic, Arc<dyn JobHandler>> {
    let mut handlers: HashMap<JobTopic, Arc<dyn JobHandler>> = HashMap::new();
    handlers.insert(JobTopic::Embedding, Arc::new(EmbeddingWorker::new(Arc::clone(&engine))));
    handlers.insert(JobTopic::Decay, Arc::new(DecayWorker::new(Arc::clone(&engine))));
    handlers.insert(JobTopic::Clustering, Arc::new(ClusteringWorker::new(Arc::clone(&engine))));
    handlers.insert(JobTopic::BatchImport, Arc::new(BatchImportWorker::new(Arc::clone(&engine))));
    handlers.insert(JobTopic::Consolidation, Arc::new(ConsolidationWorker::new(engine)));
    handlers
}

/// Dequeues `{memoryId, content, priority}`, generates the embedding, and
/// writes it back. Idempotent, and treats model/dimension errors as
/// terminal rather than retryable (spec §4.12).
pub struct EmbeddingWorker {
    engine: Arc<MemoryEngine>,
}

impl EmbeddingWorker {
    pub fn new(engine: Arc<MemoryEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl JobHandler for EmbeddingWorker {
    async fn handle(&self, payload: &Value) -> RecallResult<()> {
        let memory_id = payload
            .get("memoryId")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| RecallError::InvalidParams("embedding job missing memoryId".into()))?;

        let Some(mut memory) = self.engine.store.get_by_id_any_context(memory_id)? else {
            debug!(%memory_id, "embedding job skipped: memory no longer exists");
            return Ok(());
        };
        if memory.embedding.is_some() {
            return Ok(());
        }
        let content = payload.get("content").and_then(Value::as_str).unwrap_or_default();

        match self.engine.embeddings.embed(content) {
            Ok(vector) => {
                memory.embedding_dimension = Some(self.engine.embeddings.dimension());
                memory.embedding = Some(vector.clone());
                memory.updated_at = now();
                self.engine.store.update(&memory)?;
                self.engine
                    .cache
                    .set(recall_core::constants::CACHE_NAMESPACE_EMBEDDINGS, &memory_id.to_string(), &vector, true);
                Ok(())
            }
            Err(e) if e.is_retryable() => Err(e),
            Err(e) => {
                if !memory.metadata.is_object() {
                    memory.metadata = json!({});
                }
                memory.metadata["embeddingError"] = json!(sanitize_error(&e.to_string()));
                memory.updated_at = now();
                self.engine.store.update(&memory)?;
                Ok(())
            }
        }
    }
}

/// Runs a bounded `DecayEngine::process_batch` sweep for one user context
/// (spec §4.12: hourly per user_context, rate-limited to 5/min by the
/// runner's topic rate limiter).
pub struct DecayWorker {
    engine: Arc<MemoryEngine>,
}

impl DecayWorker {
    pub fn new(engine: Arc<MemoryEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl JobHandler for DecayWorker {
    async fn handle(&self, payload: &Value) -> RecallResult<()> {
        let user_context = payload.get("userContext").and_then(Value::as_str).unwrap_or("default");
        let batch_size = payload.get("batchSize").and_then(Value::as_u64).unwrap_or(100) as usize;

        let decay_engine = DecayEngine::new(self.engine.store.as_ref(), self.engine.config.decay.clone(), self.engine.config.limits.clone());
        let outcome = decay_engine.process_batch(user_context, batch_size)?;
        debug!(user_context, processed = outcome.processed, transitioned = outcome.transitioned, "decay batch complete");
        if !outcome.errors.is_empty() {
            warn!(user_context, errors = ?outcome.errors, "decay batch completed with per-item errors");
        }

        let retention_days = self.engine.config.decay.retention_days as i64;
        let removed = decay_engine.cleanup_expired(user_context, retention_days, batch_size)?;
        if removed > 0 {
            debug!(user_context, removed, "retention cleanup hard-deleted expired memories");
            if let Err(e) = self.engine.store.check_integrity() {
                warn!(user_context, error = %e, "post-cleanup integrity check failed to run");
            }
        }
        Ok(())
    }
}

/// Handles `full-clustering|incremental|merge-clusters|split-clusters`
/// (spec §4.12). Writes `cluster_id` only — unlike `MemoryEngine::consolidate`,
/// this worker never changes `state`.
pub struct ClusteringWorker {
    engine: Arc<MemoryEngine>,
}

impl ClusteringWorker {
    pub fn new(engine: Arc<MemoryEngine>) -> Self {
        Self { engine }
    }

    fn clusters_for(&self, user_context: &str) -> RecallResult<Vec<recall_cluster::Cluster>> {
        let predicates = MemoryPredicates::default();
        let rows = self.engine.store.list(user_context, &predicates, CLUSTER_MAINTENANCE_SCAN_LIMIT, 0)?;
        let mut by_cluster: HashMap<String, Vec<(String, Vec<f32>)>> = HashMap::new();
        for m in rows {
            if let (Some(cid), Some(embedding)) = (m.cluster_id, m.embedding) {
                by_cluster.entry(cid).or_default().push((m.id.to_string(), embedding));
            }
        }
        Ok(by_cluster.into_iter().map(|(id, members)| recall_cluster::Cluster { id, members }).collect())
    }

    fn assign(&self, id: &str, cluster_id: Option<&str>) -> RecallResult<()> {
        self.engine.store.set_cluster_id(id, cluster_id)?;
        self.engine.cache.invalidate_memory(id);
        Ok(())
    }

    fn full_clustering(&self, user_context: &str) -> RecallResult<()> {
        let cfg = self.engine.config.consolidation.clone();
        let rows = self.engine.store.all_embeddings(user_context)?;
        let ids: Vec<String> = rows.iter().map(|(id, _)| id.clone()).collect();
        let points: Vec<Vec<f32>> = rows.into_iter().map(|(_, e)| e).collect();

        let assignment = recall_cluster::run_dbscan(&points, cfg.default_epsilon, cfg.default_min_points);
        let groups = recall_cluster::group_clusters(&assignment, cfg.min_cluster_size);
        for (idx, members) in groups.iter().enumerate() {
            let cluster_id = format!("c{idx}");
            for &member_idx in members {
                if let Some(id) = ids.get(member_idx) {
                    self.assign(id, Some(&cluster_id))?;
                }
            }
        }
        Ok(())
    }

    fn merge_clusters(&self, user_context: &str) -> RecallResult<()> {
        let clusters = self.clusters_for(user_context)?;
        let merges = recall_cluster::merge_similar_clusters(&clusters, self.engine.config.consolidation.merge_similarity_threshold);
        for merge in merges {
            if let Some(from_cluster) = clusters.iter().find(|c| c.id == merge.from) {
                for (id, _) in &from_cluster.members {
                    self.assign(id, Some(&merge.into))?;
                }
            }
        }
        Ok(())
    }

    fn split_clusters(&self, user_context: &str) -> RecallResult<()> {
        let cfg = self.engine.config.consolidation.clone();
        let clusters = self.clusters_for(user_context)?;
        for cluster in &clusters {
            let Ok(parent_numeric) = cluster.id.trim_start_matches('c').parse::<u64>() else { continue };
            let Some(splits) = recall_cluster::split_large_cluster(parent_numeric, cluster, cfg.split_max_size, cfg.split_min_coherence) else {
                continue;
            };
            for split in splits {
                for member_id in &split.member_ids {
                    self.assign(member_id, Some(&split.sub_id))?;
                }
            }
        }
        Ok(())
    }

    fn incremental(&self, user_context: &str, payload: &Value) -> RecallResult<()> {
        let new_ids: HashSet<Uuid> = payload
            .get("ids")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).filter_map(|s| Uuid::parse_str(s).ok()).collect())
            .unwrap_or_default();
        if new_ids.is_empty() {
            return Ok(());
        }

        let cfg = self.engine.config.consolidation.clone();
        let predicates = MemoryPredicates::default();
        let rows = self.engine.store.list(user_context, &predicates, CLUSTER_MAINTENANCE_SCAN_LIMIT, 0)?;

        let mut existing = Vec::new();
        let mut new_points = Vec::new();
        for m in rows {
            let Some(embedding) = m.embedding else { continue };
            if new_ids.contains(&m.id) {
                new_points.push(recall_cluster::NewPoint { id: m.id.to_string(), embedding });
            } else {
                existing.push(recall_cluster::ExistingPoint { id: m.id.to_string(), cluster_id: m.cluster_id, embedding });
            }
        }

        let mut next = 0u64;
        let assignments = recall_cluster::incremental_dbscan(&existing, &new_points, cfg.default_epsilon, cfg.default_min_points, cfg.min_cluster_size, || {
            next += 1;
            format!("c{next}")
        });
        for a in assignments {
            self.assign(&a.id, a.cluster_id.as_deref())?;
        }
        Ok(())
    }
}

#[async_trait]
impl JobHandler for ClusteringWorker {
    async fn handle(&self, payload: &Value) -> RecallResult<()> {
        let user_context = payload.get("userContext").and_then(Value::as_str).unwrap_or("default").to_string();
        let strategy = payload.get("strategy").and_then(Value::as_str).unwrap_or("full-clustering");
        match strategy {
            "full-clustering" => self.full_clustering(&user_context),
            "merge-clusters" => self.merge_clusters(&user_context),
            "split-clusters" => self.split_clusters(&user_context),
            "incremental" => self.incremental(&user_context, payload),
            other => Err(RecallError::InvalidParams(format!("unknown clustering strategy: {other}"))),
        }
    }
}

/// `batch-import`: chunks of 10 items, parallel within a chunk, does not
/// abort the job on a single item's failure (spec §4.12).
pub struct BatchImportWorker {
    engine: Arc<MemoryEngine>,
}

impl BatchImportWorker {
    pub fn new(engine: Arc<MemoryEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl JobHandler for BatchImportWorker {
    async fn handle(&self, payload: &Value) -> RecallResult<()> {
        let items = payload.get("items").and_then(Value::as_array).cloned().unwrap_or_default();
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for chunk in items.chunks(10) {
            let mut tasks = Vec::with_capacity(chunk.len());
            for item in chunk {
                match StoreInput::from_json(item) {
                    Ok(input) => {
                        let engine = Arc::clone(&self.engine);
                        tasks.push(tokio::task::spawn_blocking(move || engine.store(input)));
                    }
                    Err(e) => {
                        warn!(error = %e, "batch-import item failed validation");
                        failed += 1;
                    }
                }
            }
            for task in tasks {
                match task.await {
                    Ok(Ok(_)) => succeeded += 1,
                    Ok(Err(e)) => {
                        warn!(error = %e, "batch-import item failed to store");
                        failed += 1;
                    }
                    Err(e) => {
                        warn!(error = %e, "batch-import task panicked");
                        failed += 1;
                    }
                }
            }
        }

        debug!(succeeded, failed, "batch-import job complete");
        Ok(())
    }
}

/// `consolidation`: `strategy ∈ {merge, summarize, cluster}` over a given
/// set of memory ids (spec §4.12).
pub struct ConsolidationWorker {
    engine: Arc<MemoryEngine>,
    clustering: ClusteringWorker,
}

impl ConsolidationWorker {
    pub fn new(engine: Arc<MemoryEngine>) -> Self {
        let clustering = ClusteringWorker::new(Arc::clone(&engine));
        Self { engine, clustering }
    }

    fn fetch_all(&self, user_context: &str, ids: &[Uuid]) -> RecallResult<Vec<Memory>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(m) = self.engine.store.get(user_context, id)? {
                out.push(m);
            }
        }
        Ok(out)
    }

    fn archive_originals(&self, memories: &[Memory]) -> RecallResult<()> {
        for m in memories {
            let mut archived = m.clone();
            archived.state = MemoryState::Archived;
            archived.updated_at = now();
            self.engine.store.update(&archived)?;
            self.engine.cache.invalidate_memory(&m.id.to_string());
        }
        Ok(())
    }

    fn merge(&self, user_context: &str, ids: &[Uuid]) -> RecallResult<()> {
        let originals = self.fetch_all(user_context, ids)?;
        if originals.is_empty() {
            return Ok(());
        }
        let max_confidence = originals.iter().map(|m| m.confidence).fold(0.0_f64, f64::max);
        let content = json!({
            "merged": true,
            "originalIds": originals.iter().map(|m| m.id.to_string()).collect::<Vec<_>>(),
            "mergedContent": originals.iter().map(|m| m.content.clone()).collect::<Vec<_>>(),
            "mergeDate": now().to_rfc3339(),
        });
        let mut input = StoreInput::new(user_context, content, MemoryType::Fact);
        input.r#async = false;
        input.confidence = max_confidence;
        input.importance_score = 0.8;
        self.engine.store(input)?;
        self.archive_originals(&originals)
    }

    fn summarize(&self, user_context: &str, ids: &[Uuid]) -> RecallResult<()> {
        let originals = self.fetch_all(user_context, ids)?;
        if originals.is_empty() {
            return Ok(());
        }
        let mut by_type: HashMap<MemoryType, Vec<&Memory>> = HashMap::new();
        for m in &originals {
            by_type.entry(m.memory_type).or_default().push(m);
        }
        for (ty, group) in &by_type {
            let content = json!({
                "summaryOf": format!("{ty:?}"),
                "memberIds": group.iter().map(|m| m.id.to_string()).collect::<Vec<_>>(),
                "count": group.len(),
            });
            let mut input = StoreInput::new(user_context, content, MemoryType::Insight);
            input.r#async = false;
            self.engine.store(input)?;
        }
        self.archive_originals(&originals)
    }

    fn cluster(&self, user_context: &str, payload: &Value) -> RecallResult<()> {
        let has_ids = payload.get("ids").and_then(Value::as_array).map(|a| !a.is_empty()).unwrap_or(false);
        if has_ids {
            self.clustering.incremental(user_context, payload)
        } else {
            self.clustering.full_clustering(user_context)?;
            self.clustering.merge_clusters(user_context)?;
            self.clustering.split_clusters(user_context)
        }
    }
}

#[async_trait]
impl JobHandler for ConsolidationWorker {
    async fn handle(&self, payload: &Value) -> RecallResult<()> {
        let user_context = payload.get("userContext").and_then(Value::as_str).unwrap_or("default").to_string();
        let strategy = payload.get("strategy").and_then(Value::as_str).unwrap_or("cluster");
        let ids: Vec<Uuid> = payload
            .get("ids")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).filter_map(|s| Uuid::parse_str(s).ok()).collect())
            .unwrap_or_default();

        match strategy {
            "merge" => self.merge(&user_context, &ids),
            "summarize" => self.summarize(&user_context, &ids),
            "cluster" => self.cluster(&user_context, payload),
            other => Err(RecallError::InvalidParams(format!("unknown consolidation strategy: {other}"))),
        }
    }
}
