//! Tool: memory_get_relations — list relations touching a memory (spec §4.8 getMemoryRelations, §6.1).

use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::relation_json;
use crate::params::{into_recall, required_uuid};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_get_relations".to_string(),
        description: "List all relations (incoming and outgoing) touching a memory".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "memory_id": { "type": "string" }
            },
            "required": ["memory_id"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let memory_id = required_uuid(&args, "memory_id")?;
    let relations = into_recall(engine.get_relations(memory_id))?;
    Ok(Value::Array(relations.iter().map(relation_json).collect()))
}
