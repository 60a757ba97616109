//! Tool: memory_search — semantic similarity search (spec §4.8 search, §6.1).

use recall_core::memory::MemoryType;
use recall_engine::{MemoryEngine, SearchInput};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::{RpcError, RpcResult};
use crate::output::scored_memory_json;
use crate::params::{clamped_usize, into_recall, max_content_chars, range_f64, tags, user_context};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_search".to_string(),
        description: "Semantic similarity search over a user's memories".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "maxLength": 1000 },
                "user_context": { "type": "string", "default": "default" },
                "type": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "threshold": { "type": "number", "default": 0.7 },
                "limit": { "type": "integer", "minimum": 1, "maximum": 100, "default": 10 }
            },
            "required": ["query"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let query = max_content_chars(&args, "query", 1000)?;
    let memory_type = parse_memory_type(&args)?;
    let threshold = range_f64(&args, "threshold", 0.7, 0.0, 1.0)?;
    let limit = clamped_usize(&args, "limit", 10, 1, 100)?;

    let input = SearchInput {
        user_context: user_context(&args),
        query,
        memory_type,
        tags: tags(&args),
        threshold: Some(threshold),
        limit: Some(limit),
    };
    let results = into_recall(engine.search(input))?;
    Ok(Value::Array(results.iter().map(scored_memory_json).collect()))
}

pub(crate) fn parse_memory_type(args: &Value) -> RpcResult<Option<MemoryType>> {
    match args.get("type").or_else(|| args.get("memory_type")) {
        None => Ok(None),
        Some(raw) => serde_json::from_value::<MemoryType>(raw.clone())
            .map(Some)
            .map_err(|_| RpcError::invalid_params(format!("type: invalid memory type '{raw}'"))),
    }
}
