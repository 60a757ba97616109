//! Tool catalog entries (spec §6.1). Grounded in the teacher-pack MCP
//! server's `ToolDefinition` — name, human description, and a JSON Schema
//! for the input shape.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
