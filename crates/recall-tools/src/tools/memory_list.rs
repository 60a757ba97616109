//! Tool: memory_list — paged listing (spec §4.8 list, §6.1).

use recall_engine::{ListInput, MemoryEngine};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::memories_json;
use crate::params::{clamped_usize, into_recall, tags, user_context};
use crate::tools::memory_search::parse_memory_type;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_list".to_string(),
        description: "List memories for a user, optionally filtered by type and tags".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "user_context": { "type": "string", "default": "default" },
                "type": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "limit": { "type": "integer", "minimum": 1, "maximum": 100, "default": 10 },
                "offset": { "type": "integer", "minimum": 0, "default": 0 }
            }
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let memory_type = parse_memory_type(&args)?;
    let limit = clamped_usize(&args, "limit", 10, 1, 100)?;
    let offset = clamped_usize(&args, "offset", 0, 0, usize::MAX)?;

    let input = ListInput { user_context: user_context(&args), memory_type, tags: tags(&args), limit, offset };
    let rows = into_recall(engine.list(input))?;
    Ok(memories_json(&rows))
}
