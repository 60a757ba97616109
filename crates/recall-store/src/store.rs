//! `SqliteStore`: the `MemoryStore` implementation that wires the
//! connection pool, migrations, and query modules together. Grounded in
//! the teacher's `cortex-storage::Storage` facade.

use std::path::Path;

use chrono::{DateTime, Utc};
use recall_core::errors::RecallResult;
use recall_core::memory::{Memory, MemoryRelation, RelationType};
use recall_core::models::{GraphAnalysis, MemoryStats};
use recall_core::traits::{MemoryPredicates, MemoryStore, ScoredMemory};
use uuid::Uuid;

use serde_json::Value;

use crate::convert::memory_type_str;
use crate::pool::ConnectionPool;
use crate::queries::jobs::JobRow;
use crate::queries::{decay_queries, jobs, memory_crud, relations, stats, traversal, vector_search};
use crate::schema::run_migrations;

pub struct SqliteStore {
    pool: ConnectionPool,
}

impl SqliteStore {
    pub fn open(path: &Path, pool_size: usize) -> RecallResult<Self> {
        let pool = ConnectionPool::open(path, pool_size)?;
        pool.with_writer(|conn| run_migrations(conn))?;
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> RecallResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.with_writer(|conn| run_migrations(conn))?;
        Ok(Self { pool })
    }

    /// `(memory_id, embedding)` pairs for the clustering engine (spec §4.7).
    pub fn all_embeddings(&self, user_context: &str) -> RecallResult<Vec<(String, Vec<f32>)>> {
        self.pool.with_reader(|conn| vector_search::all_embeddings(conn, user_context))
    }

    pub fn set_cluster_id(&self, id: &str, cluster_id: Option<&str>) -> RecallResult<()> {
        self.pool.with_writer(|conn| vector_search::set_cluster_id(conn, id, cluster_id))
    }

    pub fn get_relation_by_id(&self, id: Uuid) -> RecallResult<Option<MemoryRelation>> {
        self.pool.with_reader(|conn| relations::get_relation_by_id(conn, id))
    }

    pub fn both_endpoints_live(&self, from: Uuid, to: Uuid) -> RecallResult<bool> {
        self.pool.with_reader(|conn| relations::both_endpoints_live(conn, from, to))
    }

    pub fn graph_analysis(&self, user_context: &str, id: Uuid) -> RecallResult<GraphAnalysis> {
        self.pool.with_reader(|conn| stats::graph_analysis(conn, user_context, id))
    }

    pub fn top_connectors(&self, user_context: &str, limit: usize) -> RecallResult<Vec<(Uuid, u64)>> {
        self.pool.with_reader(|conn| stats::top_connectors(conn, user_context, limit))
    }

    pub fn tag_histogram(&self, user_context: &str) -> RecallResult<std::collections::HashMap<String, u64>> {
        self.pool.with_reader(|conn| stats::tag_histogram(conn, user_context))
    }

    pub fn cluster_histogram(&self, user_context: &str) -> RecallResult<std::collections::HashMap<String, u64>> {
        self.pool.with_reader(|conn| stats::cluster_histogram(conn, user_context))
    }

    pub fn get_by_id_any_context(&self, id: Uuid) -> RecallResult<Option<Memory>> {
        self.pool.with_reader(|conn| memory_crud::get_by_id_any_context(conn, id))
    }

    /// Durable job queue (spec §4.12), backed by the `jobs` table.
    pub fn enqueue_job(
        &self,
        topic: &str,
        payload: &Value,
        priority: i32,
        max_attempts: u32,
        run_at: DateTime<Utc>,
    ) -> RecallResult<Uuid> {
        self.pool.with_writer(|conn| jobs::enqueue(conn, topic, payload, priority, max_attempts, run_at))
    }

    pub fn claim_jobs(&self, topic: &str, limit: usize) -> RecallResult<Vec<JobRow>> {
        self.pool.with_writer(|conn| jobs::claim_due(conn, topic, limit))
    }

    pub fn complete_job(&self, id: Uuid) -> RecallResult<()> {
        self.pool.with_writer(|conn| jobs::mark_complete(conn, id))
    }

    /// Returns `true` if the job will be retried, `false` if attempts are
    /// exhausted and it is now terminally `failed`.
    pub fn fail_job(&self, id: Uuid, error: &str, next_run_at: Option<DateTime<Utc>>) -> RecallResult<bool> {
        self.pool.with_writer(|conn| jobs::mark_failed(conn, id, error, next_run_at))
    }

    pub fn get_job(&self, id: Uuid) -> RecallResult<Option<JobRow>> {
        self.pool.with_reader(|conn| jobs::get(conn, id))
    }

    pub fn queue_depths(&self) -> RecallResult<std::collections::HashMap<String, u64>> {
        self.pool.with_reader(jobs::pending_counts)
    }

    /// Append-only audit trail for a mutation (SPEC_FULL §A.4), mirroring
    /// the teacher's `versioning/tracker.rs`.
    pub fn record_revision(&self, memory_id: Uuid, changed_fields: &[&str]) -> RecallResult<()> {
        self.pool.with_writer(|conn| queries::revisions::record(conn, memory_id, changed_fields))
    }

    pub fn revision_count(&self, memory_id: Uuid) -> RecallResult<u64> {
        self.pool.with_reader(|conn| queries::revisions::revision_count(conn, memory_id))
    }

    /// Reclaims space freed by hard deletes (teacher's `compaction/`
    /// maintenance entry point).
    pub fn vacuum(&self) -> RecallResult<()> {
        self.pool.with_writer(|conn| {
            conn.execute_batch("VACUUM;").map_err(crate::convert::to_storage_err)
        })
    }

    /// Runs SQLite's `PRAGMA integrity_check` (teacher's
    /// `recovery/integrity_check.rs`), returning `Ok(true)` when the
    /// database reports no corruption.
    pub fn check_integrity(&self) -> RecallResult<bool> {
        self.pool.with_reader(|conn| {
            let result: String = conn
                .query_row("PRAGMA integrity_check", [], |r| r.get(0))
                .map_err(crate::convert::to_storage_err)?;
            Ok(result == "ok")
        })
    }
}

impl MemoryStore for SqliteStore {
    fn insert(&self, memory: &Memory) -> RecallResult<()> {
        self.pool.with_writer(|conn| memory_crud::insert(conn, memory))
    }

    fn get(&self, user_context: &str, id: Uuid) -> RecallResult<Option<Memory>> {
        self.pool.with_reader(|conn| memory_crud::get(conn, user_context, id))
    }

    fn find_by_hash(&self, user_context: &str, content_hash: &str) -> RecallResult<Option<Memory>> {
        self.pool.with_reader(|conn| memory_crud::find_by_hash(conn, user_context, content_hash))
    }

    fn update(&self, memory: &Memory) -> RecallResult<()> {
        self.pool.with_writer(|conn| memory_crud::update(conn, memory))
    }

    fn knn_search(
        &self,
        user_context: &str,
        query_embedding: &[f32],
        predicates: &MemoryPredicates,
        threshold: f64,
        limit: usize,
    ) -> RecallResult<Vec<ScoredMemory>> {
        self.pool
            .with_reader(|conn| vector_search::knn_search(conn, user_context, query_embedding, predicates, threshold, limit))
    }

    fn list(
        &self,
        user_context: &str,
        predicates: &MemoryPredicates,
        limit: usize,
        offset: usize,
    ) -> RecallResult<Vec<Memory>> {
        let type_str = predicates.memory_type.map(memory_type_str);
        self.pool.with_reader(|conn| {
            memory_crud::list(conn, user_context, type_str, &predicates.tags, limit, offset)
        })
    }

    fn bump_access(&self, ids: &[Uuid]) -> RecallResult<()> {
        self.pool.with_writer(|conn| memory_crud::bump_access(conn, ids))
    }

    fn soft_delete(&self, ids: &[Uuid]) -> RecallResult<()> {
        self.pool.with_writer(|conn| memory_crud::soft_delete(conn, ids))
    }

    fn hard_delete(&self, ids: &[Uuid]) -> RecallResult<()> {
        self.pool.with_writer(|conn| memory_crud::hard_delete(conn, ids))
    }

    fn upsert_relation(
        &self,
        from: Uuid,
        to: Uuid,
        relation_type: RelationType,
        strength: f64,
    ) -> RecallResult<MemoryRelation> {
        self.pool.with_writer(|conn| relations::upsert_relation(conn, from, to, relation_type, strength))
    }

    fn delete_relation(&self, from: Uuid, to: Uuid) -> RecallResult<bool> {
        self.pool.with_writer(|conn| relations::delete_relation(conn, from, to))
    }

    fn get_relations(&self, memory_id: Uuid) -> RecallResult<Vec<MemoryRelation>> {
        self.pool.with_reader(|conn| relations::get_relations(conn, memory_id))
    }

    fn outgoing_relations(&self, id: Uuid) -> RecallResult<Vec<MemoryRelation>> {
        self.pool.with_reader(|conn| relations::outgoing(conn, id))
    }

    fn incoming_relations(&self, id: Uuid) -> RecallResult<Vec<MemoryRelation>> {
        self.pool.with_reader(|conn| relations::incoming(conn, id))
    }

    fn children_of(&self, user_context: &str, id: Uuid) -> RecallResult<Vec<Memory>> {
        self.pool.with_reader(|conn| traversal::children_of(conn, user_context, id))
    }

    fn parent_of(&self, user_context: &str, id: Uuid) -> RecallResult<Option<Memory>> {
        self.pool.with_reader(|conn| traversal::parent_of(conn, user_context, id))
    }

    fn expired_before(&self, user_context: &str, cutoff: DateTime<Utc>, limit: usize) -> RecallResult<Vec<Memory>> {
        self.pool.with_reader(|conn| decay_queries::expired_before(conn, user_context, cutoff, limit))
    }

    fn due_for_decay(&self, user_context: &str, cutoff: DateTime<Utc>, limit: usize) -> RecallResult<Vec<Memory>> {
        self.pool.with_reader(|conn| decay_queries::due_for_decay(conn, user_context, cutoff, limit))
    }

    fn stats(&self, user_context: &str) -> RecallResult<MemoryStats> {
        self.pool.with_reader(|conn| stats::stats(conn, user_context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::memory::{Memory, MemoryState, MemoryType};
    use serde_json::json;

    fn sample(user_context: &str) -> Memory {
        let now = Utc::now();
        let content = json!({"text": format!("hello-{}", Uuid::new_v4())});
        Memory {
            id: Uuid::new_v4(),
            user_context: user_context.to_string(),
            content_hash: Memory::compute_content_hash(&content),
            content,
            embedding: Some(vec![1.0, 0.0, 0.0]),
            embedding_dimension: Some(3),
            tags: Vec::new(),
            memory_type: MemoryType::Fact,
            source: "test".to_string(),
            confidence: 0.5,
            importance_score: 0.5,
            similarity_threshold: 0.7,
            decay_rate: 0.01,
            access_count: 0,
            parent_id: None,
            relation_type: None,
            cluster_id: None,
            created_at: now,
            updated_at: now,
            accessed_at: now,
            deleted_at: None,
            last_decay_update: now,
            state: MemoryState::Active,
            decay_score: 1.0,
            is_compressed: false,
            metadata: json!({}),
        }
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = sample("ctx-a");
        store.insert(&m).unwrap();
        let fetched = store.get("ctx-a", m.id).unwrap().unwrap();
        assert_eq!(fetched.id, m.id);
        assert_eq!(fetched.content, m.content);
        assert_eq!(fetched.embedding, m.embedding);
    }

    #[test]
    fn find_by_hash_scoped_to_user_context() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = sample("ctx-a");
        store.insert(&m).unwrap();
        assert!(store.find_by_hash("ctx-a", &m.content_hash).unwrap().is_some());
        assert!(store.find_by_hash("ctx-b", &m.content_hash).unwrap().is_none());
    }

    #[test]
    fn soft_delete_excludes_from_get() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = sample("ctx-a");
        store.insert(&m).unwrap();
        store.soft_delete(&[m.id]).unwrap();
        assert!(store.get("ctx-a", m.id).unwrap().is_none());
    }

    #[test]
    fn knn_search_orders_by_similarity() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut near = sample("ctx-a");
        near.embedding = Some(vec![1.0, 0.0, 0.0]);
        let mut far = sample("ctx-a");
        far.embedding = Some(vec![0.0, 1.0, 0.0]);
        store.insert(&near).unwrap();
        store.insert(&far).unwrap();

        let results = store
            .knn_search("ctx-a", &[1.0, 0.0, 0.0], &MemoryPredicates::default(), 0.0, 10)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].memory.id, near.id);
    }

    #[test]
    fn relation_upsert_is_idempotent_on_pair() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = sample("ctx-a");
        let b = sample("ctx-a");
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();
        store.upsert_relation(a.id, b.id, RelationType::References, 0.5).unwrap();
        store.upsert_relation(a.id, b.id, RelationType::Supports, 0.9).unwrap();
        let rels = store.get_relations(a.id).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].relation_type, RelationType::Supports);
        assert!((rels[0].strength - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_counts_by_type_and_state() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&sample("ctx-a")).unwrap();
        store.insert(&sample("ctx-a")).unwrap();
        let s = store.stats("ctx-a").unwrap();
        assert_eq!(s.total, 2);
        assert_eq!(s.by_type.get(&MemoryType::Fact).copied().unwrap_or(0), 2);
    }
}
