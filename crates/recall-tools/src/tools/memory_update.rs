//! Tool: memory_update — whitelisted-field update (spec §4.8 update, §6.1).

use recall_engine::{MemoryEngine, UpdateInput};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::memory_json;
use crate::params::{into_recall, required_uuid, user_context};
use crate::tools::memory_search::parse_memory_type;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_update".to_string(),
        description: "Update whitelisted fields on a memory (tags, confidence, importance_score, type, source)".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Memory uuid" },
                "user_context": { "type": "string", "default": "default" },
                "updates": {
                    "type": "object",
                    "properties": {
                        "tags": { "type": "array", "items": { "type": "string" } },
                        "confidence": { "type": "number" },
                        "importance_score": { "type": "number" },
                        "type": { "type": "string" },
                        "source": { "type": "string" },
                        "preserve_timestamps": { "type": "boolean", "default": false }
                    }
                }
            },
            "required": ["id", "updates"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let id = required_uuid(&args, "id")?;
    let updates = args.get("updates").cloned().unwrap_or(Value::Object(serde_json::Map::new()));

    let tags = updates
        .get("tags")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect());
    let confidence = updates.get("confidence").and_then(Value::as_f64);
    let importance_score = updates.get("importance_score").and_then(Value::as_f64);
    let memory_type = parse_memory_type(&updates)?;
    let source = updates.get("source").and_then(Value::as_str).map(str::to_string);
    let preserve_timestamps = updates.get("preserve_timestamps").and_then(Value::as_bool).unwrap_or(false);

    let input = UpdateInput {
        user_context: user_context(&args),
        id,
        tags,
        confidence,
        importance_score,
        memory_type,
        source,
        preserve_timestamps,
    };
    let memory = into_recall(engine.update(input))?;
    Ok(memory_json(&memory))
}
