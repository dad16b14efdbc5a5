//! Manual verification route for the search adapter.
//!
//! Skips the tool registry and all schema validation: a malformed or missing
//! body falls back to the placeholder query and a result count of 3.

use crate::error::Result;
use crate::search::SearchResult;
use crate::state::AppState;
use crate::tools::whole_count;
use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Query used when the body carries no string `q`.
pub const PLACEHOLDER_QUERY: &str = "workers";

/// Result count used when the body carries no numeric `topK`.
pub const PLACEHOLDER_TOP_K: u32 = 3;

#[derive(Debug, Serialize)]
pub struct TestSearchResponse {
    pub items: Vec<SearchResult>,
}

/// Extract `(q, topK)` from an arbitrary request body.
pub fn lenient_query(body: &[u8]) -> (String, u32) {
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    let q = body
        .get("q")
        .and_then(Value::as_str)
        .unwrap_or(PLACEHOLDER_QUERY)
        .to_string();

    let top_k = body
        .get("topK")
        .and_then(|top_k| match top_k {
            Value::Number(number) => whole_count(number),
            _ => None,
        })
        .map(|top_k| top_k.min(u64::from(u32::MAX)) as u32)
        .unwrap_or(PLACEHOLDER_TOP_K);

    (q, top_k)
}

/// POST /test/cf_docs.search - Run the search adapter directly.
pub async fn test_search_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TestSearchResponse>> {
    let (q, top_k) = lenient_query(&body);
    let items = state.search.search(&q, top_k).await?;
    Ok(Json(TestSearchResponse { items }))
}
