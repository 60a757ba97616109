//! Tool: memory_batch_delete — soft-delete many ids at once (spec §4.8 batchDelete, §6.1).

use recall_engine::MemoryEngine;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::definition::ToolDefinition;
use crate::error::{RpcError, RpcResult};
use crate::params::into_recall;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_batch_delete".to_string(),
        description: "Soft-delete one or more memories by id".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "ids": { "type": "array", "minItems": 1, "items": { "type": "string" } }
            },
            "required": ["ids"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let raw_ids = args
        .get("ids")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| RpcError::invalid_params("ids: required non-empty array"))?;

    let mut ids = Vec::with_capacity(raw_ids.len());
    for (idx, v) in raw_ids.iter().enumerate() {
        let raw = v.as_str().ok_or_else(|| RpcError::invalid_params(format!("ids[{idx}]: must be a string")))?;
        let id = Uuid::parse_str(raw).map_err(|_| RpcError::invalid_params(format!("ids[{idx}]: must be a uuid")))?;
        ids.push(id);
    }

    let deleted = into_recall(engine.batch_delete(&ids))?;
    Ok(json!({ "deleted": deleted }))
}
