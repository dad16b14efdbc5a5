use serde::{Deserialize, Serialize};

use crate::config::SearchCredentials;
use crate::error::{AppError, Result};
use crate::search::hit::{RawHit, SearchResult};

/// Smallest `hitsPerPage` sent upstream.
pub const MIN_HITS_PER_PAGE: u32 = 1;
/// Largest `hitsPerPage` sent upstream.
pub const MAX_HITS_PER_PAGE: u32 = 20;

const ATTRIBUTES_TO_RETRIEVE: [&str; 3] = ["hierarchy", "url", "content"];
const ATTRIBUTES_TO_SNIPPET: [&str; 1] = ["content:20"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    hits_per_page: u32,
    attributes_to_retrieve: &'a [&'a str],
    attributes_to_snippet: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    hits: Option<Vec<RawHit>>,
}

/// HTTP client for the Algolia DocSearch query endpoint.
///
/// Holds no per-request state; the inner `reqwest::Client` pools connections
/// and is cheap to clone.
#[derive(Debug, Clone)]
pub struct AlgoliaClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl AlgoliaClient {
    /// Build a client. `base_url` overrides the per-application host.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// Query endpoint for the given credentials.
    pub fn endpoint(&self, credentials: &SearchCredentials) -> String {
        let origin = match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}-dsn.algolia.net", credentials.application_id),
        };
        format!(
            "{}/1/indexes/{}/query",
            origin,
            urlencoding::encode(&credentials.index_name)
        )
    }

    /// Run one query against the index.
    ///
    /// # Flow
    /// 1. Validate credentials (no request is sent if any is missing)
    /// 2. POST the fixed query shape with `hitsPerPage` clamped to 1..=20
    /// 3. Map non-2xx responses to `UpstreamError` with the body text
    /// 4. Parse `hits` (absent means empty) and normalize in upstream order
    pub async fn search(
        &self,
        credentials: &SearchCredentials,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchResult>> {
        credentials.validate()?;

        let body = QueryRequest {
            query,
            hits_per_page: limit.clamp(MIN_HITS_PER_PAGE, MAX_HITS_PER_PAGE),
            attributes_to_retrieve: &ATTRIBUTES_TO_RETRIEVE,
            attributes_to_snippet: &ATTRIBUTES_TO_SNIPPET,
        };

        let response = self
            .http
            .post(self.endpoint(credentials))
            .header("X-Algolia-Application-Id", &credentials.application_id)
            .header("X-Algolia-API-Key", &credentials.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Body is best-effort; a read failure must not hide the status.
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: QueryResponse =
            serde_json::from_str(&text).map_err(|e| AppError::UpstreamError {
                status: status.as_u16(),
                body: format!("unparseable response body: {}", e),
            })?;

        Ok(parsed
            .hits
            .unwrap_or_default()
            .into_iter()
            .map(SearchResult::from)
            .collect())
    }
}
