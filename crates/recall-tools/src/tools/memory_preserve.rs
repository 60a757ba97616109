//! Tool: memory_preserve — pin a memory against decay (spec §4.10 preserve, §6.1).

use chrono::{DateTime, Utc};
use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::memory_json;
use crate::params::{into_recall, required_uuid, user_context};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_preserve".to_string(),
        description: "Pin a memory against decay, optionally until a given ISO-8601 instant".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "memory_id": { "type": "string" },
                "user_context": { "type": "string", "default": "default" },
                "until": { "type": "string", "description": "Optional ISO-8601 instant" }
            },
            "required": ["memory_id"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let memory_id = required_uuid(&args, "memory_id")?;
    let until = match args.get("until").and_then(Value::as_str) {
        None => None,
        Some(raw) => Some(
            raw.parse::<DateTime<Utc>>()
                .map_err(|_| crate::error::RpcError::invalid_params("until: must be an ISO-8601 instant"))?,
        ),
    };

    let preserved = into_recall(engine.preserve(&user_context(&args), memory_id, until))?;
    match preserved {
        Some(memory) => Ok(memory_json(&memory)),
        None => Err(crate::error::RpcError::Recall(recall_core::errors::RecallError::NotFound(memory_id.to_string()))),
    }
}
