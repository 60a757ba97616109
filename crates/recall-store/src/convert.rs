//! Row <-> `Memory` / `MemoryRelation` conversion.

use chrono::{DateTime, Utc};
use recall_core::errors::{RecallError, RecallResult, StorageError};
use recall_core::memory::{Memory, MemoryRelation, MemoryState, MemoryType, RelationType};
use rusqlite::Row;
use uuid::Uuid;

pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

pub fn memory_type_str(t: MemoryType) -> &'static str {
    match t {
        MemoryType::Fact => "fact",
        MemoryType::Conversation => "conversation",
        MemoryType::Decision => "decision",
        MemoryType::Insight => "insight",
        MemoryType::Error => "error",
        MemoryType::Context => "context",
        MemoryType::Preference => "preference",
        MemoryType::Task => "task",
        MemoryType::Merged => "merged",
        MemoryType::Summary => "summary",
    }
}

pub fn parse_memory_type(s: &str) -> MemoryType {
    match s {
        "fact" => MemoryType::Fact,
        "conversation" => MemoryType::Conversation,
        "decision" => MemoryType::Decision,
        "insight" => MemoryType::Insight,
        "error" => MemoryType::Error,
        "context" => MemoryType::Context,
        "preference" => MemoryType::Preference,
        "task" => MemoryType::Task,
        "merged" => MemoryType::Merged,
        _ => MemoryType::Summary,
    }
}

fn state_str(s: MemoryState) -> &'static str {
    match s {
        MemoryState::Active => "active",
        MemoryState::Dormant => "dormant",
        MemoryState::Archived => "archived",
        MemoryState::Expired => "expired",
    }
}

pub fn parse_state(s: &str) -> MemoryState {
    match s {
        "dormant" => MemoryState::Dormant,
        "archived" => MemoryState::Archived,
        "expired" => MemoryState::Expired,
        _ => MemoryState::Active,
    }
}

fn relation_type_str(t: RelationType) -> &'static str {
    match t {
        RelationType::References => "references",
        RelationType::Contradicts => "contradicts",
        RelationType::Supports => "supports",
        RelationType::Extends => "extends",
        RelationType::Causes => "causes",
        RelationType::CausedBy => "caused_by",
        RelationType::Precedes => "precedes",
        RelationType::Follows => "follows",
        RelationType::PartOf => "part_of",
        RelationType::Contains => "contains",
        RelationType::RelatesTo => "relates_to",
    }
}

pub struct MemoryParams {
    pub content: String,
    pub content_hash: String,
    pub embedding: Option<Vec<u8>>,
    pub embedding_dimension: Option<u32>,
    pub tags: String,
    pub memory_type: &'static str,
    pub state: &'static str,
}

pub fn to_params(m: &Memory) -> MemoryParams {
    MemoryParams {
        content: m.content.to_string(),
        content_hash: m.content_hash.clone(),
        embedding: m.embedding.as_ref().map(|v| f32_vec_to_bytes(v)),
        embedding_dimension: m.embedding_dimension,
        tags: serde_json::to_string(&m.tags).unwrap_or_else(|_| "[]".to_string()),
        memory_type: memory_type_str(m.memory_type),
        state: state_str(m.state),
    }
}

pub fn row_to_memory(row: &Row) -> rusqlite::Result<Memory> {
    let id: String = row.get("id")?;
    let content_raw: String = row.get("content")?;
    let tags_raw: String = row.get("tags")?;
    let metadata_raw: String = row.get("metadata")?;
    let embedding_blob: Option<Vec<u8>> = row.get("embedding")?;
    let parent_id: Option<String> = row.get("parent_id")?;
    let deleted_at: Option<String> = row.get("deleted_at")?;

    Ok(Memory {
        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
        user_context: row.get("user_context")?,
        content: serde_json::from_str(&content_raw).unwrap_or(serde_json::Value::Null),
        content_hash: row.get("content_hash")?,
        embedding: embedding_blob.map(|b| bytes_to_f32_vec(&b)),
        embedding_dimension: row.get::<_, Option<i64>>("embedding_dimension")?.map(|v| v as u32),
        tags: serde_json::from_str(&tags_raw).unwrap_or_default(),
        memory_type: parse_memory_type(&row.get::<_, String>("memory_type")?),
        source: row.get("source")?,
        confidence: row.get("confidence")?,
        importance_score: row.get("importance_score")?,
        similarity_threshold: row.get("similarity_threshold")?,
        decay_rate: row.get("decay_rate")?,
        access_count: row.get::<_, i64>("access_count")? as u64,
        parent_id: parent_id.and_then(|s| Uuid::parse_str(&s).ok()),
        relation_type: row.get("relation_type")?,
        cluster_id: row.get("cluster_id")?,
        created_at: parse_dt(&row.get::<_, String>("created_at")?),
        updated_at: parse_dt(&row.get::<_, String>("updated_at")?),
        accessed_at: parse_dt(&row.get::<_, String>("accessed_at")?),
        deleted_at: deleted_at.map(|s| parse_dt(&s)),
        last_decay_update: parse_dt(&row.get::<_, String>("last_decay_update")?),
        state: parse_state(&row.get::<_, String>("state")?),
        decay_score: row.get("decay_score")?,
        is_compressed: row.get::<_, i64>("is_compressed")? != 0,
        metadata: serde_json::from_str(&metadata_raw).unwrap_or(serde_json::json!({})),
    })
}

pub fn row_to_relation(row: &Row) -> rusqlite::Result<MemoryRelation> {
    let id: String = row.get("id")?;
    let from: String = row.get("from_memory_id")?;
    let to: String = row.get("to_memory_id")?;
    Ok(MemoryRelation {
        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
        from_memory_id: Uuid::parse_str(&from).unwrap_or_else(|_| Uuid::nil()),
        to_memory_id: Uuid::parse_str(&to).unwrap_or_else(|_| Uuid::nil()),
        relation_type: RelationType::parse_or_default(&row.get::<_, String>("relation_type")?),
        strength: row.get("strength")?,
        created_at: parse_dt(&row.get::<_, String>("created_at")?),
        updated_at: parse_dt(&row.get::<_, String>("updated_at")?),
    })
}

pub fn relation_type_param(t: RelationType) -> &'static str {
    relation_type_str(t)
}

pub fn fmt_dt(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_dt(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub fn to_storage_err(e: rusqlite::Error) -> RecallError {
    RecallError::from(StorageError::Sqlite { message: e.to_string() })
}
