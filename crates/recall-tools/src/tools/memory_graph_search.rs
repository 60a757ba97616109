//! Tool: memory_graph_search — search then breadth-expand over relations
//! (spec §4.8 graphSearch, §6.1). Also accepted as a backward-compatible
//! alias of `memory_traverse` when called with a `start_memory_id` instead
//! of a `query`.

use recall_engine::{GraphSearchInput, MemoryEngine};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::{memory_json, relationship_ref_json};
use crate::params::{clamped_usize, into_recall, max_content_chars, tags, user_context};
use crate::tools::memory_search::parse_memory_type;
use crate::tools::memory_traverse;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_graph_search".to_string(),
        description: "Semantic search seeded expansion over relations and parent links (also accepts memory_traverse-style args for backward compatibility)".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "user_context": { "type": "string", "default": "default" },
                "depth": { "type": "integer", "minimum": 1, "maximum": 3, "default": 1 },
                "type": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "threshold": { "type": "number" },
                "limit": { "type": "integer" },
                "start_memory_id": { "type": "string", "description": "backward-compat alias for memory_traverse" }
            }
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    if args.get("query").is_none() && args.get("start_memory_id").is_some() {
        return memory_traverse::execute(engine, args);
    }

    let query = max_content_chars(&args, "query", 1000)?;
    let depth = clamped_usize(&args, "depth", 1, 1, 3)? as u32;
    let memory_type = parse_memory_type(&args)?;
    let threshold = args.get("threshold").and_then(Value::as_f64);
    if let Some(t) = threshold {
        into_recall(recall_core::sanitize::validate_range("threshold", t, 0.0, 1.0))?;
    }
    let limit = match args.get("limit") {
        None => None,
        Some(_) => Some(clamped_usize(&args, "limit", 10, 1, 100)?),
    };

    let input = GraphSearchInput { user_context: user_context(&args), query, depth, memory_type, tags: tags(&args), threshold, limit };
    let nodes = into_recall(engine.graph_search(input))?;

    let out: Vec<Value> = nodes
        .iter()
        .map(|n| {
            json!({
                "memory": memory_json(&n.memory),
                "depth": n.depth,
                "relationships": n.relationships.iter().map(relationship_ref_json).collect::<Vec<_>>(),
            })
        })
        .collect();
    Ok(Value::Array(out))
}
