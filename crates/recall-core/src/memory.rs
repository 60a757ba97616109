//! The universal `Memory` record and its satellite types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storable memory kinds. `Merged` and `Summary` are produced internally
/// by consolidation and are not user-storable (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Fact,
    Conversation,
    Decision,
    Insight,
    Error,
    Context,
    Preference,
    Task,
    Merged,
    Summary,
}

impl MemoryType {
    /// Whether a caller may set this type directly via `memory_store`.
    pub fn is_user_storable(self) -> bool {
        !matches!(self, MemoryType::Merged | MemoryType::Summary)
    }
}

/// Lifecycle state driven by the decay engine (spec §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryState {
    Active,
    Dormant,
    Archived,
    Expired,
}

impl Default for MemoryState {
    fn default() -> Self {
        MemoryState::Active
    }
}

/// The universal memory record. Every row in the store is a `Memory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    /// Tenant-scoping key. Every query must filter on this.
    pub user_context: String,
    /// Semi-structured content — arbitrary JSON or a plain string wrapped
    /// as `{"text": ...}` by callers.
    pub content: serde_json::Value,
    /// Stable blake3 hash of the canonical content serialization.
    pub content_hash: String,
    pub embedding: Option<Vec<f32>>,
    pub embedding_dimension: Option<u32>,
    pub tags: Vec<String>,
    pub memory_type: MemoryType,
    pub source: String,
    pub confidence: f64,
    pub importance_score: f64,
    pub similarity_threshold: f64,
    pub decay_rate: f64,
    pub access_count: u64,
    pub parent_id: Option<Uuid>,
    pub relation_type: Option<String>,
    pub cluster_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_decay_update: DateTime<Utc>,
    pub state: MemoryState,
    pub decay_score: f64,
    pub is_compressed: bool,
    pub metadata: serde_json::Value,
}

impl Memory {
    /// Compute the stable content hash used for dedup (spec §3, §4.8).
    ///
    /// Hashes the canonical (serde_json, stable key order via `BTreeMap`
    /// re-serialization is not needed since `serde_json::Value::Object`
    /// is a `BTreeMap` internally, so key order is already canonical).
    pub fn compute_content_hash(content: &serde_json::Value) -> String {
        let serialized = serde_json::to_string(content).unwrap_or_default();
        blake3::hash(serialized.as_bytes()).to_hex().to_string()
    }

    /// True once `deleted_at` is set (spec invariant: invisible to all
    /// read paths once soft-deleted).
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The timestamp decay/recency math should treat as "last touched":
    /// `accessed_at`, defaulting to `created_at` if never accessed.
    pub fn effective_accessed_at(&self) -> DateTime<Utc> {
        self.accessed_at
    }
}

/// Canonical relation types between two memories (spec §3). Unknown
/// inputs are normalized to `RelatesTo` at the validation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    References,
    Contradicts,
    Supports,
    Extends,
    Causes,
    CausedBy,
    Precedes,
    Follows,
    PartOf,
    Contains,
    RelatesTo,
}

impl RelationType {
    /// Parse a free-form string into a canonical relation type, falling
    /// back to `RelatesTo` for anything unrecognized.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "references" => RelationType::References,
            "contradicts" => RelationType::Contradicts,
            "supports" => RelationType::Supports,
            "extends" => RelationType::Extends,
            "causes" => RelationType::Causes,
            "caused_by" => RelationType::CausedBy,
            "precedes" => RelationType::Precedes,
            "follows" => RelationType::Follows,
            "part_of" => RelationType::PartOf,
            "contains" => RelationType::Contains,
            _ => RelationType::RelatesTo,
        }
    }

    /// The reverse relation used by `createBidirectionalRelation` (spec
    /// §4.8). Pairs without a natural inverse map to themselves.
    pub fn reverse(self) -> Self {
        match self {
            RelationType::Extends => RelationType::References,
            RelationType::References => RelationType::Extends,
            RelationType::Causes => RelationType::CausedBy,
            RelationType::CausedBy => RelationType::Causes,
            RelationType::Precedes => RelationType::Follows,
            RelationType::Follows => RelationType::Precedes,
            RelationType::PartOf => RelationType::Contains,
            RelationType::Contains => RelationType::PartOf,
            other => other,
        }
    }
}

/// A directed edge between two memories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRelation {
    pub id: Uuid,
    pub from_memory_id: Uuid,
    pub to_memory_id: Uuid,
    pub relation_type: RelationType,
    pub strength: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
