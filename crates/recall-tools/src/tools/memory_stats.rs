//! Tool: memory_stats — aggregate counts, tag and cluster histograms (spec §4.8 getStats, §6.1).

use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::params::{into_recall, user_context};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_stats".to_string(),
        description: "Aggregate stats — counts by type/state, tag histogram, cluster histogram".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "user_context": { "type": "string", "default": "default" }
            }
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let stats = into_recall(engine.full_stats(&user_context(&args)))?;
    serde_json::to_value(stats).map_err(|e| crate::error::RpcError::invalid_params(e.to_string()))
}
