//! Trait seams so alternative embedding providers, caches, and stores can
//! be swapped in (SPEC_FULL §9 design notes / teacher's `cortex-core::traits`).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::RecallResult;
use crate::memory::{Memory, MemoryRelation, MemoryType, RelationType};

/// Opaque `text -> vector` embedding capability (spec §4.3, §9).
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> RecallResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
    /// Fixed dimension `d` for this deployment.
    fn dimension(&self) -> u32;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
}

/// Predicates applied by `knn_search` / `list` (spec §4.4).
#[derive(Debug, Clone, Default)]
pub struct MemoryPredicates {
    pub memory_type: Option<MemoryType>,
    pub tags: Vec<String>,
}

/// A similarity search hit.
#[derive(Debug, Clone)]
pub struct ScoredMemory {
    pub memory: Memory,
    pub similarity: f64,
}

/// Typed, vector-aware access to the persistence layer (spec §4.4).
pub trait MemoryStore: Send + Sync {
    fn insert(&self, memory: &Memory) -> RecallResult<()>;
    fn get(&self, user_context: &str, id: Uuid) -> RecallResult<Option<Memory>>;
    fn find_by_hash(&self, user_context: &str, content_hash: &str) -> RecallResult<Option<Memory>>;
    fn update(&self, memory: &Memory) -> RecallResult<()>;

    fn knn_search(
        &self,
        user_context: &str,
        query_embedding: &[f32],
        predicates: &MemoryPredicates,
        threshold: f64,
        limit: usize,
    ) -> RecallResult<Vec<ScoredMemory>>;

    fn list(
        &self,
        user_context: &str,
        predicates: &MemoryPredicates,
        limit: usize,
        offset: usize,
    ) -> RecallResult<Vec<Memory>>;

    fn bump_access(&self, ids: &[Uuid]) -> RecallResult<()>;
    fn soft_delete(&self, ids: &[Uuid]) -> RecallResult<()>;
    fn hard_delete(&self, ids: &[Uuid]) -> RecallResult<()>;

    fn upsert_relation(
        &self,
        from: Uuid,
        to: Uuid,
        relation_type: RelationType,
        strength: f64,
    ) -> RecallResult<MemoryRelation>;
    fn delete_relation(&self, from: Uuid, to: Uuid) -> RecallResult<bool>;
    fn get_relations(&self, memory_id: Uuid) -> RecallResult<Vec<MemoryRelation>>;

    fn outgoing_relations(&self, id: Uuid) -> RecallResult<Vec<MemoryRelation>>;
    fn incoming_relations(&self, id: Uuid) -> RecallResult<Vec<MemoryRelation>>;
    fn children_of(&self, user_context: &str, id: Uuid) -> RecallResult<Vec<Memory>>;
    fn parent_of(&self, user_context: &str, id: Uuid) -> RecallResult<Option<Memory>>;

    fn expired_before(
        &self,
        user_context: &str,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> RecallResult<Vec<Memory>>;

    fn due_for_decay(
        &self,
        user_context: &str,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> RecallResult<Vec<Memory>>;

    fn stats(&self, user_context: &str) -> RecallResult<crate::models::MemoryStats>;
}
