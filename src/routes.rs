use crate::handlers::{
    health_handler, mcp_handler, sse_handler, sse_message_handler, test_search_handler,
};
use crate::state::AppState;
use crate::tools::DOCS_SEARCH_TOOL;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the HTTP surface.
///
/// - `POST /test/cf_docs.search` runs the search adapter directly
/// - `GET /sse` opens an event-stream session; `POST /sse` and
///   `POST /sse/message` deliver messages to it
/// - `POST /mcp` is the request/response transport
/// - `GET /health` liveness check
/// - anything else, including a known path with the wrong method, is a 404
///   with an empty body
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("/test/{}", DOCS_SEARCH_TOOL),
            post(test_search_handler).fallback(not_found),
        )
        .route(
            "/sse",
            get(sse_handler)
                .post(sse_message_handler)
                .fallback(not_found),
        )
        .route("/sse/message", post(sse_message_handler).fallback(not_found))
        .route("/mcp", post(mcp_handler).fallback(not_found))
        .route("/health", get(health_handler).fallback(not_found))
        .fallback(not_found)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        // State
        .with_state(state)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
