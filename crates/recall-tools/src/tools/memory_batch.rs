//! Tool: memory_batch — store up to 100 memories without aborting on a
//! single item's failure (spec §4.8 batchStore, §6.1).

use recall_engine::{MemoryEngine, StoreInput};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::memory_json;

const MAX_BATCH: usize = 100;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_batch".to_string(),
        description: "Store 1-100 memories in one call; per-item failures don't abort the batch".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "memories": { "type": "array", "minItems": 1, "maxItems": MAX_BATCH }
            },
            "required": ["memories"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let items = args
        .get("memories")
        .and_then(Value::as_array)
        .ok_or_else(|| crate::error::RpcError::invalid_params("memories: required array"))?;
    if items.is_empty() || items.len() > MAX_BATCH {
        return Err(crate::error::RpcError::invalid_params(format!(
            "memories: must contain 1-{MAX_BATCH} items, got {}",
            items.len()
        )));
    }

    let mut inputs = Vec::with_capacity(items.len());
    let mut parse_failures = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match StoreInput::from_json(item) {
            Ok(input) => inputs.push(input),
            Err(e) => parse_failures.push((idx, e.to_string())),
        }
    }

    let outcome = engine.batch_store(inputs);
    let succeeded: Vec<Value> = outcome.succeeded.iter().map(memory_json).collect();
    let mut failed: Vec<Value> = outcome.failed.iter().map(|(idx, msg)| json!({ "index": idx, "error": msg })).collect();
    failed.extend(parse_failures.iter().map(|(idx, msg)| json!({ "index": idx, "error": msg })));

    Ok(json!({ "succeeded": succeeded, "failed": failed }))
}
