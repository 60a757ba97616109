//! Tool: memory_decay_status — current decay score/state for a memory (spec §4.10 status, §6.1).

use recall_engine::MemoryEngine;
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::memory_json;
use crate::params::{into_recall, required_uuid, user_context};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_decay_status".to_string(),
        description: "Read a memory's current decay score and lifecycle state".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "memory_id": { "type": "string" },
                "user_context": { "type": "string", "default": "default" }
            },
            "required": ["memory_id"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let memory_id = required_uuid(&args, "memory_id")?;
    let memory = into_recall(engine.decay_status(&user_context(&args), memory_id))?;
    Ok(json!({
        "id": memory.id,
        "state": memory.state,
        "decayScore": memory.decay_score,
        "lastDecayUpdate": memory.last_decay_update,
        "accessedAt": memory.accessed_at,
        "memory": memory_json(&memory),
    }))
}
