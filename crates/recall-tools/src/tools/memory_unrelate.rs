//! Tool: memory_unrelate — delete a directed relation (spec §4.8 deleteRelation, §6.1).

use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::params::{into_recall, required_uuid};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_unrelate".to_string(),
        description: "Delete a directed relation between two memories".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "from": { "type": "string" },
                "to": { "type": "string" }
            },
            "required": ["from", "to"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let from = required_uuid(&args, "from")?;
    let to = required_uuid(&args, "to")?;
    let deleted = into_recall(engine.delete_relation(from, to))?;
    Ok(json!({ "deleted": deleted }))
}
