//! Tool registration and dispatch (spec §6.1). Grounded in the teacher
//! pack's MCP `ToolRegistry` pattern: a flat catalog plus a name match that
//! falls through to `MethodNotFound` for anything unrecognized.

use recall_engine::MemoryEngine;
use serde_json::Value;

use crate::definition::ToolDefinition;
use crate::error::{RpcError, RpcResult};
use crate::tools::*;

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            memory_store::definition(),
            memory_search::definition(),
            memory_list::definition(),
            memory_update::definition(),
            memory_delete::definition(),
            memory_batch::definition(),
            memory_batch_delete::definition(),
            memory_graph_search::definition(),
            memory_consolidate::definition(),
            memory_stats::definition(),
            memory_relate::definition(),
            memory_unrelate::definition(),
            memory_get_relations::definition(),
            memory_traverse::definition(),
            memory_decay_status::definition(),
            memory_preserve::definition(),
            memory_graph_analysis::definition(),
        ]
    }

    pub fn call(engine: &MemoryEngine, name: &str, args: Option<Value>) -> RpcResult<Value> {
        let args = args.unwrap_or(Value::Object(serde_json::Map::new()));
        match name {
            "memory_store" => memory_store::execute(engine, args),
            "memory_search" => memory_search::execute(engine, args),
            "memory_list" => memory_list::execute(engine, args),
            "memory_update" => memory_update::execute(engine, args),
            "memory_delete" => memory_delete::execute(engine, args),
            "memory_batch" => memory_batch::execute(engine, args),
            "memory_batch_delete" => memory_batch_delete::execute(engine, args),
            "memory_graph_search" => memory_graph_search::execute(engine, args),
            "memory_consolidate" => memory_consolidate::execute(engine, args),
            "memory_stats" => memory_stats::execute(engine, args),
            "memory_relate" => memory_relate::execute(engine, args),
            "memory_unrelate" => memory_unrelate::execute(engine, args),
            "memory_get_relations" => memory_get_relations::execute(engine, args),
            "memory_traverse" => memory_traverse::execute(engine, args),
            "memory_decay_status" => memory_decay_status::execute(engine, args),
            "memory_preserve" => memory_preserve::execute(engine, args),
            "memory_graph_analysis" => memory_graph_analysis::execute(engine, args),
            other => Err(RpcError::MethodNotFound(other.to_string())),
        }
    }
}
