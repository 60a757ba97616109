//! Input/output shapes for the memory engine operations (spec §4.8).
//! These are the types the tool façade (C13) will construct and consume.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{Memory, MemoryType, RelationType};
use recall_core::models::MemoryStats;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// A `relate_to` entry attached to a `store` call (spec §4.8 step f).
#[derive(Debug, Clone)]
pub struct RelateTo {
    pub to: Uuid,
    pub relation_type: RelationType,
    pub strength: f64,
}

impl RelateTo {
    pub fn from_json(v: &Value) -> RecallResult<Self> {
        let to = v
            .get("to")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| RecallError::InvalidParams("relate_to.to: must be a uuid".into()))?;
        let relation_type = v
            .get("relation_type")
            .or_else(|| v.get("relationType"))
            .and_then(Value::as_str)
            .map(RelationType::parse_or_default)
            .unwrap_or(RelationType::RelatesTo);
        let strength = v.get("strength").and_then(Value::as_f64).unwrap_or(0.5);
        Ok(Self { to, relation_type, strength })
    }
}

#[derive(Debug, Clone)]
pub struct StoreInput {
    pub user_context: String,
    pub content: Value,
    pub memory_type: MemoryType,
    pub tags: Vec<String>,
    pub source: String,
    pub confidence: f64,
    pub importance_score: f64,
    pub similarity_threshold: f64,
    pub decay_rate: f64,
    pub parent_id: Option<Uuid>,
    pub relation_type: Option<String>,
    pub relate_to: Vec<RelateTo>,
    pub r#async: bool,
}

impl StoreInput {
    pub fn new(user_context: impl Into<String>, content: Value, memory_type: MemoryType) -> Self {
        Self {
            user_context: user_context.into(),
            content,
            memory_type,
            tags: Vec::new(),
            source: String::new(),
            confidence: 0.5,
            importance_score: 0.5,
            similarity_threshold: 0.7,
            decay_rate: 0.01,
            parent_id: None,
            relation_type: None,
            relate_to: Vec::new(),
            r#async: true,
        }
    }

    /// Parses a raw `memory_store`/`memory_batch` item (spec §6.1: content,
    /// type, source, confidence∈[0,1] required). Shared by the tool façade
    /// and the batch-import job handler so both paths validate identically.
    pub fn from_json(v: &Value) -> RecallResult<Self> {
        let content = v
            .get("content")
            .cloned()
            .ok_or_else(|| RecallError::InvalidParams("content: required".into()))?;
        let memory_type = v
            .get("type")
            .or_else(|| v.get("memory_type"))
            .ok_or_else(|| RecallError::InvalidParams("type: required".into()))
            .and_then(|t| {
                serde_json::from_value::<MemoryType>(t.clone())
                    .map_err(|_| RecallError::InvalidParams(format!("type: invalid memory type '{t}'")))
            })?;
        let source = v
            .get("source")
            .and_then(Value::as_str)
            .ok_or_else(|| RecallError::InvalidParams("source: required".into()))?
            .to_string();
        let confidence = v
            .get("confidence")
            .and_then(Value::as_f64)
            .ok_or_else(|| RecallError::InvalidParams("confidence: required".into()))?;
        recall_core::sanitize::validate_range("confidence", confidence, 0.0, 1.0)?;

        let user_context = v.get("user_context").and_then(Value::as_str).unwrap_or("default").to_string();
        let tags: Vec<String> = v
            .get("tags")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        let importance_score = v.get("importance_score").and_then(Value::as_f64).unwrap_or(0.5);
        let similarity_threshold = v.get("similarity_threshold").and_then(Value::as_f64).unwrap_or(0.7);
        let decay_rate = v.get("decay_rate").and_then(Value::as_f64).unwrap_or(0.01);
        let parent_id = v
            .get("parent_id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok());
        let relation_type = v.get("relation_type").and_then(Value::as_str).map(str::to_string);
        let relate_to = v
            .get("relate_to")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(|e| RelateTo::from_json(e).ok()).collect())
            .unwrap_or_default();
        let r#async = v.get("async").and_then(Value::as_bool).unwrap_or(true);

        Ok(Self {
            user_context,
            content,
            memory_type,
            tags,
            source,
            confidence,
            importance_score,
            similarity_threshold,
            decay_rate,
            parent_id,
            relation_type,
            relate_to,
            r#async,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub user_context: String,
    pub query: String,
    pub memory_type: Option<MemoryType>,
    pub tags: Vec<String>,
    pub threshold: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ListInput {
    pub user_context: String,
    pub memory_type: Option<MemoryType>,
    pub tags: Vec<String>,
    pub limit: usize,
    pub offset: usize,
}

/// Whitelisted-field update (spec §4.8: "only whitelisted fields").
#[derive(Debug, Clone, Default)]
pub struct UpdateInput {
    pub user_context: String,
    pub id: Uuid,
    pub tags: Option<Vec<String>>,
    pub confidence: Option<f64>,
    pub importance_score: Option<f64>,
    pub memory_type: Option<MemoryType>,
    pub source: Option<String>,
    pub preserve_timestamps: bool,
}

#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Id(Uuid),
    ContentHash(String),
}

#[derive(Debug, Default)]
pub struct BatchStoreOutcome {
    pub succeeded: Vec<Memory>,
    pub failed: Vec<(usize, String)>,
}

#[derive(Debug, Clone)]
pub struct GraphSearchInput {
    pub user_context: String,
    pub query: String,
    pub depth: u32,
    pub memory_type: Option<MemoryType>,
    pub tags: Vec<String>,
    pub threshold: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipRef {
    pub related_id: Uuid,
    pub relation_type: RelationType,
    pub strength: f64,
}

#[derive(Debug, Clone)]
pub struct GraphSearchNode {
    pub memory: Memory,
    pub depth: u32,
    pub relationships: Vec<RelationshipRef>,
}

#[derive(Debug, Clone)]
pub struct ConsolidateInput {
    pub user_context: String,
    /// Similarity threshold; `epsilon = 1 - threshold` (spec §4.8).
    pub threshold: f64,
    pub min_cluster_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsolidateOutput {
    pub clusters_created: usize,
    pub memories_archived: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineStats {
    #[serde(flatten)]
    pub stats: MemoryStats,
    pub tags: HashMap<String, u64>,
    pub clusters: HashMap<String, u64>,
}

/// `memory_health` resource (SPEC_FULL §B), grounded in the teacher's
/// `cortex-drift-bridge/src/health/readiness.rs` operational surface.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub database_ok: bool,
    pub cache_remote_available: bool,
    pub cache_local_entries: u64,
    pub embedding_provider: String,
    pub embedding_provider_available: bool,
    pub queue_depths: HashMap<String, u64>,
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}
