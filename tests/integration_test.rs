//! Integration tests for the HTTP surface and the search adapter.
//!
//! The upstream index is replaced by a wiremock server; credentials are
//! injected through `CredentialSource::Fixed`, so the process environment is
//! never touched.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cf_docs_mcp::{
    create_router, AlgoliaClient, AppState, Config, CredentialSource, DocsSearch,
    SearchCredentials,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/1/indexes/docs_cloudflare/query";

fn credentials() -> SearchCredentials {
    SearchCredentials::new("TESTAPP", "search-key", "docs_cloudflare")
}

/// Helper to create the full router against a mock upstream.
fn create_test_app(upstream: &MockServer, credentials: SearchCredentials) -> Router {
    let client = AlgoliaClient::new(Some(upstream.uri())).expect("client");
    let search = DocsSearch::new(client, CredentialSource::Fixed(credentials));
    create_router(Arc::new(AppState::with_search(Config::default(), search)))
}

/// Helper to send a raw request and collect status and body bytes.
async fn raw_request(app: Router, method: &str, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, body_bytes.to_vec())
}

/// Helper to make a JSON request to the router.
async fn json_request(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, bytes) = raw_request(app, "POST", uri, Body::from(body.to_string())).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(json!({}));
    (status, body)
}

// ============================================================================
// Test Route
// ============================================================================

#[tokio::test]
async fn test_search_route_returns_normalized_items() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("X-Algolia-Application-Id", "TESTAPP"))
        .and(header("X-Algolia-API-Key", "search-key"))
        .and(body_partial_json(json!({
            "query": "durable objects",
            "hitsPerPage": 5,
            "attributesToRetrieve": ["hierarchy", "url", "content"],
            "attributesToSnippet": ["content:20"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [
                {
                    "hierarchy": { "lvl0": "Workers", "lvl1": "Durable Objects" },
                    "url": "/x",
                    "content": "...",
                    "_rankingInfo": { "nbTypos": 1 }
                },
                { "content": "Second hit" }
            ]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = create_test_app(&upstream, credentials());
    let (status, body) = json_request(
        app,
        "/test/cf_docs.search",
        json!({ "q": "durable objects", "topK": 5 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    // Upstream order is preserved
    assert_eq!(items[0]["title"], "Workers");
    assert_eq!(items[0]["url"], "/x");
    assert_eq!(items[0]["snippet"], "...");
    assert_eq!(items[0]["score"], 0.5);
    assert_eq!(items[1]["title"], "Second hit");
    assert!(items[1].get("url").is_none());
    assert!(items[1].get("score").is_none());
}

#[tokio::test]
async fn test_search_route_defaults_on_malformed_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "query": "workers", "hitsPerPage": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hits": [] })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = create_test_app(&upstream, credentials());
    let (status, bytes) =
        raw_request(app, "POST", "/test/cf_docs.search", Body::from("{not json")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "items": [] }));
}

#[tokio::test]
async fn test_search_route_missing_hits_is_empty() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nbHits": 0 })))
        .mount(&upstream)
        .await;

    let app = create_test_app(&upstream, credentials());
    let (status, body) = json_request(app, "/test/cf_docs.search", json!({ "q": "kv" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [] }));
}

#[tokio::test]
async fn test_search_route_upstream_error_returns_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("Invalid Application-ID or API key"))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = create_test_app(&upstream, credentials());
    let (status, body) = json_request(app, "/test/cf_docs.search", json!({ "q": "r2" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("403"), "{error}");
    assert!(error.contains("Invalid Application-ID or API key"), "{error}");
}

#[tokio::test]
async fn test_search_route_unparseable_upstream_body_returns_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&upstream)
        .await;

    let app = create_test_app(&upstream, credentials());
    let (status, body) = json_request(app, "/test/cf_docs.search", json!({ "q": "r2" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("unparseable"));
}

#[tokio::test]
async fn test_missing_credential_makes_no_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hits": [] })))
        .expect(0)
        .mount(&upstream)
        .await;

    let missing = [
        (SearchCredentials::new("", "search-key", "docs_cloudflare"), "ALGOLIA_CF_APP_ID"),
        (SearchCredentials::new("TESTAPP", "", "docs_cloudflare"), "ALGOLIA_CF_SEARCH_KEY"),
        (SearchCredentials::new("TESTAPP", "search-key", ""), "ALGOLIA_CF_INDEX"),
    ];

    for (credentials, variable) in missing {
        let app = create_test_app(&upstream, credentials);
        let (status, body) =
            json_request(app, "/test/cf_docs.search", json!({ "q": "workers" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains(variable));
    }

    assert!(upstream.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_unknown_path_returns_empty_404() {
    let upstream = MockServer::start().await;

    for (method, uri) in [
        ("GET", "/"),
        ("GET", "/nope"),
        ("POST", "/test/other.tool"),
        ("POST", "/mcp/extra"),
        ("GET", "/test/cf_docs.search"),
        ("PUT", "/sse"),
        ("DELETE", "/sse/message"),
        ("GET", "/mcp"),
        ("POST", "/health"),
    ] {
        let app = create_test_app(&upstream, credentials());
        let (status, body) = raw_request(app, method, uri, Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert!(body.is_empty(), "{method} {uri}");
    }
}

#[tokio::test]
async fn test_health_endpoint_returns_200() {
    let upstream = MockServer::start().await;
    let app = create_test_app(&upstream, credentials());
    let (status, bytes) = raw_request(app, "GET", "/health", Body::empty()).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tools"], 3);
}
