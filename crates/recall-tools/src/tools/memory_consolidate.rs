//! Tool: memory_consolidate — DBSCAN clustering + archival (spec §4.8 consolidate, §6.1).

use recall_engine::{ConsolidateInput, MemoryEngine};
use serde_json::{json, Value};

use crate::definition::ToolDefinition;
use crate::error::RpcResult;
use crate::params::{clamped_usize, into_recall, range_f64, user_context};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "memory_consolidate".to_string(),
        description: "Cluster similar memories by cosine distance and archive the resulting groups".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "user_context": { "type": "string", "default": "default" },
                "threshold": { "type": "number", "minimum": 0.5, "maximum": 0.95, "default": 0.8 },
                "min_cluster_size": { "type": "integer", "minimum": 2, "default": 3 }
            }
        }),
    }
}

pub fn execute(engine: &MemoryEngine, args: Value) -> RpcResult<Value> {
    let threshold = range_f64(&args, "threshold", 0.8, 0.5, 0.95)?;
    let min_cluster_size = match args.get("min_cluster_size") {
        None => None,
        Some(_) => Some(clamped_usize(&args, "min_cluster_size", 3, 2, usize::MAX)?),
    };

    let input = ConsolidateInput { user_context: user_context(&args), threshold, min_cluster_size };
    let output = into_recall(engine.consolidate(input))?;
    serde_json::to_value(output).map_err(|e| crate::error::RpcError::invalid_params(e.to_string()))
}
