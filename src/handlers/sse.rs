//! Event-stream transport.
//!
//! `GET /sse` opens a stream whose first `endpoint` event tells the client
//! where to POST its messages. Replies to those messages are delivered on the
//! stream as `message` events.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;

/// Path clients POST session messages to.
pub const SSE_MESSAGE_PATH: &str = "/sse/message";

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// GET /sse - Open an event-stream session.
pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (guard, rx) = state.sessions.open();
    let endpoint = format!("{}?sessionId={}", SSE_MESSAGE_PATH, guard.id());
    tracing::info!(session_id = %guard.id(), "SSE session started");

    let endpoint_event = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint))
    });

    // The guard lives inside the stream; dropping the stream ends the session.
    let messages = ReceiverStream::new(rx).map(move |response| {
        let _session = &guard;
        let data = serde_json::to_string(&response).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().event("message").data(data))
    });

    let keep_alive = Duration::from_secs(state.config.sse_keep_alive_secs.max(1));
    Sse::new(endpoint_event.chain(messages)).keep_alive(KeepAlive::new().interval(keep_alive))
}

/// POST /sse/message?sessionId=… - Deliver a client message to a session.
pub async fn sse_message_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing sessionId").into_response();
    };

    if !state.sessions.contains(&session_id) {
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    }

    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Unparseable SSE message");
            return (StatusCode::BAD_REQUEST, "Invalid JSON").into_response();
        }
    };

    let messages = match message {
        Value::Array(batch) => batch,
        message => vec![message],
    };

    for message in messages {
        let Some(response) = state.mcp.handle_message(message).await else {
            continue;
        };
        if !state.sessions.send(&session_id, response) {
            return (StatusCode::NOT_FOUND, "Session not found").into_response();
        }
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
