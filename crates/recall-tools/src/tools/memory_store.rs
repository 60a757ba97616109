//! Tool: memory_store — ingest a new memory (spec §4.8 store, §6.1).

use recall_engine::{MemoryEngine, StoreInput};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::memory_json;
use crate::params::into_recall;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_store".to_string(),
        description: "Store a new memory, deduping on content hash and enqueuing embedding".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "content": { "description": "Memory payload, arbitrary JSON or {\"text\": ...}" },
                "type": { "type": "string", "description": "Memory type (fact, conversation, decision, ...)" },
                "source": { "type": "string" },
                "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                "user_context": { "type": "string", "default": "default" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "importance_score": { "type": "number", "default": 0.5 },
                "similarity_threshold": { "type": "number", "default": 0.7 },
                "decay_rate": { "type": "number", "default": 0.01 },
                "parent_id": { "type": "string" },
                "relation_type": { "type": "string" },
                "relate_to": { "type": "array" },
                "async": { "type": "boolean", "default": true }
            },
            "required": ["content", "type", "source", "confidence"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let input = into_recall(StoreInput::from_json(&args))?;
    let memory = into_recall(engine.store(input))?;
    Ok(memory_json(&memory))
}
