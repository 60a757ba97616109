//! RPC error codes and the façade's error type (spec §7: propagation policy —
//! validation errors become `InvalidParams`, other kinds pass through with
//! their taxonomy, unknown tools become `MethodNotFound`).

use recall_core::errors::{ErrorKind, RecallError, ToolError};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Custom codes for the taxonomy members that don't map onto a standard
/// JSON-RPC code (spec §7).
pub mod recall_error_codes {
    pub const NOT_FOUND: i32 = -32001;
    pub const CONFLICT: i32 = -32002;
    pub const TRANSIENT: i32 = -32003;
    pub const LOGIC: i32 = -32004;
    pub const DATA: i32 = -32005;
    pub const RESOURCE_NOT_FOUND: i32 = -32006;
}

/// Errors produced by the tool façade. Wraps `RecallError` for engine-level
/// failures and adds the protocol-level cases the engine has no concept of.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error(transparent)]
    Recall(#[from] RecallError),
}

impl RpcError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        RpcError::Recall(RecallError::InvalidParams(message.into()))
    }

    /// True when this error should be reported as a JSON-RPC error object
    /// rather than a successful, `isError`-flagged tool result. Every
    /// façade error is protocol-visible — unlike a full MCP server, this
    /// surface has no distinct "tool execution failure" channel (spec §7:
    /// "other exceptions pass through with their kind").
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use recall_error_codes::*;
        match self {
            RpcError::ParseError(_) => PARSE_ERROR,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            RpcError::Recall(RecallError::Tool(ToolError::MethodNotFound(_))) => METHOD_NOT_FOUND,
            RpcError::Recall(e) => match e.kind() {
                ErrorKind::InvalidParams => INVALID_PARAMS,
                ErrorKind::NotFound => NOT_FOUND,
                ErrorKind::Conflict => CONFLICT,
                ErrorKind::Transient => TRANSIENT,
                ErrorKind::Logic => LOGIC,
                ErrorKind::Data => DATA,
            },
        }
    }
}

pub type RpcResult<T> = Result<T, RpcError>;
