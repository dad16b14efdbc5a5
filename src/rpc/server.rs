//! Model Context Protocol dispatcher over the tool registry.
//!
//! Transport-agnostic: both `/mcp` and the `/sse` session endpoints feed raw
//! JSON messages into [`McpServer::handle_message`] and deliver whatever
//! response comes back.

use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::message::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND,
};
use crate::error::ToolError;
use crate::tools::{ToolRegistry, ToolResponse};

/// Protocol revisions this server can speak, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    protocol_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>, info: ServerInfo) -> Self {
        Self { registry, info }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Handle one raw message. Returns `None` for notifications and for
    /// responses sent by the client.
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        if message.get("method").is_none() && message.get("id").is_some() {
            // A client response to a server request; this server sends none.
            return None;
        }

        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ))
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version {:?}", request.jsonrpc),
            ));
        }

        self.handle_request(request).await
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        let Some(id) = id else {
            tracing::debug!(method = %method, "Notification received");
            return None;
        };

        let outcome = match method.as_str() {
            "initialize" => Ok(self.initialize(params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.list() })),
            "tools/call" => self.call_tool(params).await,
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err((code, message)) => {
                tracing::debug!(method = %method, code, error = %message, "Request rejected");
                JsonRpcResponse::failure(id, code, message)
            }
        })
    }

    fn initialize(&self, params: Option<Value>) -> Value {
        let requested = params
            .and_then(|params| serde_json::from_value::<InitializeParams>(params).ok())
            .and_then(|params| params.protocol_version);

        let protocol_version = requested
            .filter(|version| SUPPORTED_PROTOCOL_VERSIONS.contains(&version.as_str()))
            .unwrap_or_else(|| SUPPORTED_PROTOCOL_VERSIONS[0].to_string());

        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": self.info.name, "version": self.info.version }
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, (i64, String)> {
        let params: CallToolParams = params
            .ok_or_else(|| "Missing params for tools/call".to_string())
            .and_then(|params| serde_json::from_value(params).map_err(|e| e.to_string()))
            .map_err(|message| (INVALID_PARAMS, message))?;

        let response = match self.registry.invoke(&params.name, params.arguments).await {
            Ok(response) => response,
            Err(e @ (ToolError::NotFound(_) | ToolError::InvalidParams { .. })) => {
                return Err((INVALID_PARAMS, e.to_string()));
            }
            Err(ToolError::Failed(e)) => {
                tracing::warn!(tool = %params.name, error = %e, "Tool call failed");
                ToolResponse::error(e.to_string())
            }
        };

        Ok(json!(response))
    }
}
