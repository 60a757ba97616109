//! Tool: memory_graph_analysis — degree/relation-type breakdown for one node (spec §4.9 analysis, §6.1).

use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::params::{into_recall, required_str, required_uuid};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_graph_analysis".to_string(),
        description: "In/out degree and relation-type breakdown for a single memory".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "memory_id": { "type": "string" },
                "user_context": { "type": "string" }
            },
            "required": ["memory_id", "user_context"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let memory_id = required_uuid(&args, "memory_id")?;
    let user_context = required_str(&args, "user_context")?;
    let analysis = into_recall(engine.graph_analysis(user_context, memory_id))?;
    serde_json::to_value(analysis).map_err(|e| crate::error::RpcError::invalid_params(e.to_string()))
}
