//! Tool: memory_traverse — bounded BFS/DFS over relations and optional
//! parent links (spec §4.9, §6.1).

use recall_engine::{Algorithm, MemoryEngine, TraverseOptions};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::output::traversed_node_json;
use crate::params::{clamped_usize, into_recall, required_str, required_uuid};
use crate::tools::memory_search::parse_memory_type;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_traverse".to_string(),
        description: "Bounded breadth/depth-first traversal over relations and parent links from a start memory".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "start_memory_id": { "type": "string" },
                "user_context": { "type": "string" },
                "algorithm": { "type": "string", "enum": ["bfs", "dfs"], "default": "bfs" },
                "max_depth": { "type": "integer", "minimum": 1, "maximum": 5, "default": 3 },
                "max_nodes": { "type": "integer", "minimum": 1, "maximum": 1000, "default": 100 },
                "type": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "include_parent_links": { "type": "boolean", "default": false },
                "timeout_ms": { "type": "integer", "default": 5000 }
            },
            "required": ["start_memory_id", "user_context"]
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let start_id = required_uuid(&args, "start_memory_id")?;
    let user_context = required_str(&args, "user_context")?.to_string();
    let memory_type = parse_memory_type(&args)?;
    let algorithm = match args.get("algorithm").and_then(Value::as_str) {
        None | Some("bfs") => Algorithm::Bfs,
        Some("dfs") => Algorithm::Dfs,
        Some(other) => return Err(crate::error::RpcError::invalid_params(format!("algorithm: unknown '{other}'"))),
    };
    let max_depth = clamped_usize(&args, "max_depth", 3, 1, 5)? as u32;
    let max_nodes = clamped_usize(&args, "max_nodes", 100, 1, 1000)? as u32;
    let include_parent_links = args.get("include_parent_links").and_then(Value::as_bool).unwrap_or(false);
    let timeout_ms = args.get("timeout_ms").and_then(Value::as_u64).unwrap_or(5000);
    let tags: Vec<String> = args
        .get("tags")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    let opts = TraverseOptions {
        start_id,
        user_context,
        algorithm,
        max_depth,
        max_nodes,
        relation_types: None,
        memory_types: memory_type.map(|t| vec![t]),
        tags,
        include_parent_links,
        timeout_ms,
    };
    let result = into_recall(engine.traverse(opts))?;
    Ok(json!({
        "nodes": result.nodes.iter().map(traversed_node_json).collect::<Vec<_>>(),
        "truncatedByTimeout": result.truncated_by_timeout,
    }))
}
