//! Tool-RPC façade (spec §4.13, §6.1, §6.2): the catalog of operations, JSON
//! input validation/sanitization, and RPC error-code mapping over the
//! memory engine. Grounded in the teacher pack's MCP tool-registry pattern
//! (`agentic-memory-mcp::tools`) — the wire framing itself is out of scope
//! (spec §1) and lives in `recall-server`.

pub mod definition;
pub mod error;
pub mod message;
pub mod output;
pub mod params;
pub mod registry;
pub mod resources;
pub mod tools;

pub use definition::ToolDefinition;
pub use error::{RpcError, RpcResult};
pub use registry::ToolRegistry;
pub use resources::ResourceRegistry;
