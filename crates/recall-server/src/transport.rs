//! Line-delimited JSON-RPC stdio loop (spec §1: "the tool-RPC transport
//! framing... covered only by the tool catalog and error mapping" — this is
//! the minimal ambient wiring that satisfies that contract). Grounded in
//! the teacher pack's `StdioTransport::run` read-dispatch-write loop,
//! simplified to one JSON value per line since the Content-Length framing
//! variant isn't part of what the spec asks this surface to do.

use std::sync::Arc;

use recall_engine::MemoryEngine;
use recall_tools::message::{JsonRpcError, JsonRpcMessage, JsonRpcResponse, RequestId};
use recall_tools::{ResourceRegistry, RpcError, ToolRegistry};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

pub struct StdioTransport {
    engine: Arc<MemoryEngine>,
}

impl StdioTransport {
    pub fn new(engine: Arc<MemoryEngine>) -> Self {
        Self { engine }
    }

    pub async fn run(&self) -> std::io::Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        info!("recall-server stdio transport started");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                info!("EOF on stdin, shutting down");
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let response = self.handle_line(trimmed);
            let serialized = serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string());
            stdout.write_all(serialized.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    fn handle_line(&self, raw: &str) -> Value {
        let parsed: Result<Value, _> = serde_json::from_str(raw);
        let raw_value = match parsed {
            Ok(v) => v,
            Err(e) => {
                let err = JsonRpcError::from_rpc_error(RequestId::Null, &RpcError::ParseError(e.to_string()));
                return serde_json::to_value(err).unwrap_or(Value::Null);
            }
        };

        match JsonRpcMessage::parse(&raw_value) {
            Ok(JsonRpcMessage::Request(req)) => {
                let id = req.id.clone();
                match self.dispatch(&req.method, req.params) {
                    Ok(result) => serde_json::to_value(JsonRpcResponse::new(id, result)).unwrap_or(Value::Null),
                    Err(e) => serde_json::to_value(JsonRpcError::from_rpc_error(id, &e)).unwrap_or(Value::Null),
                }
            }
            Ok(JsonRpcMessage::Notification(notif)) => {
                warn!(method = %notif.method, "ignoring notification, this surface is request/response only");
                Value::Null
            }
            Err(e) => serde_json::to_value(JsonRpcError::from_rpc_error(RequestId::Null, &e)).unwrap_or(Value::Null),
        }
    }

    fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
        match method {
            "tools/list" => {
                let tools = ToolRegistry::list_tools();
                Ok(serde_json::json!({ "tools": tools }))
            }
            "tools/call" => {
                let params = params.ok_or_else(|| RpcError::InvalidRequest("tools/call requires params".into()))?;
                let name = params
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RpcError::InvalidRequest("tools/call requires params.name".into()))?
                    .to_string();
                let arguments = params.get("arguments").cloned();
                ToolRegistry::call(&self.engine, &name, arguments)
            }
            "resources/list" => Ok(serde_json::json!({ "resources": ResourceRegistry::list_resources() })),
            "resources/read" => {
                let params = params.ok_or_else(|| RpcError::InvalidRequest("resources/read requires params".into()))?;
                let uri = params
                    .get("uri")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RpcError::InvalidRequest("resources/read requires params.uri".into()))?;
                let user_context = params.get("user_context").and_then(Value::as_str).unwrap_or("default");
                ResourceRegistry::read(&self.engine, uri, user_context)
            }
            "ping" => Ok(Value::Object(serde_json::Map::new())),
            other => Err(RpcError::MethodNotFound(other.to_string())),
        }
    }
}
