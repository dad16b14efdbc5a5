//! Cloudflare Docs search adapter backed by Algolia DocSearch.
//!
//! One invocation performs exactly one upstream request: no retries, no
//! caching, and no state carried between calls.

pub mod client;
pub mod hit;

pub use client::{AlgoliaClient, MAX_HITS_PER_PAGE, MIN_HITS_PER_PAGE};
pub use hit::{derive_score, derive_title, RawHit, SearchResult, FALLBACK_TITLE};

use crate::config::CredentialSource;
use crate::error::Result;
use std::time::Instant;

/// Default number of results when the caller does not ask for a count.
pub const DEFAULT_TOP_K: u32 = 8;

/// Search entry point shared by the tool registry and the test route.
///
/// Credentials are resolved from the [`CredentialSource`] on every call.
#[derive(Debug, Clone)]
pub struct DocsSearch {
    client: AlgoliaClient,
    credentials: CredentialSource,
}

impl DocsSearch {
    pub fn new(client: AlgoliaClient, credentials: CredentialSource) -> Self {
        Self {
            client,
            credentials,
        }
    }

    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        let start_time = Instant::now();
        let credentials = self.credentials.resolve();

        let result = self.client.search(&credentials, query, limit).await;
        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        metrics::counter!("docs_search_requests_total").increment(1);
        metrics::histogram!("docs_search_latency_ms").record(elapsed_ms as f64);

        match &result {
            Ok(items) => {
                tracing::info!(
                    query = %query,
                    limit,
                    results = items.len(),
                    elapsed_ms,
                    "Docs search completed"
                );
            }
            Err(e) => {
                metrics::counter!("docs_search_errors_total").increment(1);
                tracing::warn!(query = %query, limit, elapsed_ms, error = %e, "Docs search failed");
            }
        }

        result
    }
}
