//! Tool: memory_relate — create/upsert a directed relation (spec §4.8 createRelation, §6.1).

use recall_core::memory::RelationType;
use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::relation_json;
use crate::params::{into_recall, range_f64, required_uuid};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_relate".to_string(),
        description: "Create or upsert a directed relation between two memories".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "from": { "type": "string" },
                "to": { "type": "string" },
                "relation_type": { "type": "string" },
                "strength": { "type": "number", "minimum": 0.0, "maximum": 1.0, "default": 0.5 }
            },
            "required": ["from", "to", "relation_type"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let from = required_uuid(&args, "from")?;
    let to = required_uuid(&args, "to")?;
    let relation_type_raw = args
        .get("relation_type")
        .and_then(Value::as_str)
        .ok_or_else(|| crate::error::RpcError::invalid_params("relation_type: required"))?;
    let relation_type = RelationType::parse_or_default(relation_type_raw);
    let strength = range_f64(&args, "strength", 0.5, 0.0, 1.0)?;

    let relation = into_recall(engine.create_relation(from, to, relation_type, strength))?;
    Ok(relation_json(&relation))
}
