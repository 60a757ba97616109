//! JSON-RPC 2.0 envelope types. The wire framing itself is out of scope
//! (spec §1); these are the shapes `recall-server`'s transport loop parses
//! requests into and serializes responses from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

impl Default for RequestId {
    fn default() -> Self {
        RequestId::Null
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcNotification {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
}

impl JsonRpcMessage {
    /// A message with an `id` field is a request; without, a notification
    /// (JSON-RPC 2.0 §4/§4.1).
    pub fn parse(raw: &Value) -> Result<Self, crate::error::RpcError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| crate::error::RpcError::InvalidRequest("request must be a JSON object".into()))?;
        let method = obj
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| crate::error::RpcError::InvalidRequest("missing method".into()))?
            .to_string();
        let params = obj.get("params").cloned();
        if obj.contains_key("id") {
            let id: RequestId = serde_json::from_value(obj["id"].clone())
                .map_err(|e| crate::error::RpcError::InvalidRequest(format!("invalid id: {e}")))?;
            Ok(JsonRpcMessage::Request(JsonRpcRequest { jsonrpc: JSONRPC_VERSION.to_string(), id, method, params }))
        } else {
            Ok(JsonRpcMessage::Notification(JsonRpcNotification { jsonrpc: JSONRPC_VERSION.to_string(), method, params }))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self { jsonrpc: JSONRPC_VERSION.to_string(), id, result }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

impl JsonRpcError {
    pub fn from_rpc_error(id: RequestId, err: &crate::error::RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject { code: err.code(), message: err.to_string(), data: None },
        }
    }
}
