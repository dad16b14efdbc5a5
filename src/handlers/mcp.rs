use crate::rpc::message::{INVALID_REQUEST, PARSE_ERROR};
use crate::rpc::JsonRpcResponse;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

/// POST /mcp - Request/response transport.
///
/// Accepts a single JSON-RPC message or a batch. Replies with the response
/// (or array of responses) as JSON, or 202 with no body when every message
/// was a notification.
pub async fn mcp_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable MCP request body");
            let response =
                JsonRpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    match message {
        Value::Array(batch) if batch.is_empty() => {
            let response =
                JsonRpcResponse::failure(Value::Null, INVALID_REQUEST, "Empty batch");
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        }
        Value::Array(batch) => {
            let mut responses = Vec::with_capacity(batch.len());
            for message in batch {
                if let Some(response) = state.mcp.handle_message(message).await {
                    responses.push(response);
                }
            }
            if responses.is_empty() {
                StatusCode::ACCEPTED.into_response()
            } else {
                Json(responses).into_response()
            }
        }
        message => match state.mcp.handle_message(message).await {
            Some(response) => Json(response).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        },
    }
}
