//! Tool: memory_delete — soft-delete by id or content hash (spec §4.8 delete, §6.1).

use recall_engine::{DeleteTarget, MemoryEngine};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::{RpcError, RpcResult};
use crate::params::{into_recall, user_context};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_delete".to_string(),
        description: "Soft-delete a memory by id or content_hash".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "content_hash": { "type": "string" },
                "user_context": { "type": "string", "default": "default" }
            }
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let target = match args.get("id").and_then(Value::as_str) {
        Some(raw) => {
            let id = uuid::Uuid::parse_str(raw).map_err(|_| RpcError::invalid_params("id: must be a uuid"))?;
            DeleteTarget::Id(id)
        }
        None => match args.get("content_hash").and_then(Value::as_str) {
            Some(hash) => DeleteTarget::ContentHash(hash.to_string()),
            None => return Err(RpcError::invalid_params("id or content_hash: required")),
        },
    };
    let deleted = into_recall(engine.delete(&user_context(&args), target))?;
    Ok(json!({ "deleted": deleted }))
}
