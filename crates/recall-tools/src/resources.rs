//! Read-only JSON resource endpoints (spec §6.2): `stats`, `types`, `tags`,
//! `relationships`, `clusters`.

use recall_core::memory::MemoryType;
use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::error::{RpcError, RpcResult};
use crate::params::into_recall;

const MEMORY_TYPES: [MemoryType; 10] = [
    MemoryType::Fact,
    MemoryType::Conversation,
    MemoryType::Decision,
    MemoryType::Insight,
    MemoryType::Error,
    MemoryType::Context,
    MemoryType::Preference,
    MemoryType::Task,
    MemoryType::Merged,
    MemoryType::Summary,
];

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_resources() -> Vec<&'static str> {
        vec!["stats", "types", "tags", "relationships", "clusters", "health"]
    }

    /// Resources are all scoped to a `user_context` except `types` (a
    /// static catalog) and `health` (a deployment-wide operational surface).
    pub fn read(engine: &MemoryEngine, uri: &str, user_context: &str) -> RpcResult<Value> {
        match uri {
            "stats" => into_recall(engine.full_stats(user_context)).map(|s| serde_json::to_value(s).unwrap_or(Value::Null)),
            "types" => Ok(json!(MEMORY_TYPES.map(|t| serde_json::to_value(t).unwrap_or(Value::Null)))),
            "health" => Ok(serde_json::to_value(engine.health()).unwrap_or(Value::Null)),
            "tags" => into_recall(engine.tags(user_context)).map(|m| json!(m)),
            "relationships" => {
                // Relation reads are scoped per-memory (spec §4.9); this resource reports
                // the cluster/tag histogram's sibling view — a per-memory relation count
                // isn't meaningful without an id, so it surfaces the tag histogram's analog
                // via top connectors instead of an unbounded relation dump.
                into_recall(engine.top_connectors(user_context, 20)).map(|rows| {
                    json!(rows.into_iter().map(|(id, count)| json!({ "memoryId": id, "connections": count })).collect::<Vec<_>>())
                })
            }
            "clusters" => into_recall(engine.clusters(user_context)).map(|m| json!(m)),
            other => Err(RpcError::ResourceNotFound(other.to_string())),
        }
    }
}
