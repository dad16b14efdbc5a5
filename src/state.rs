use crate::config::{Config, CredentialSource};
use crate::error::Result;
use crate::rpc::{McpServer, ServerInfo, SessionStore};
use crate::search::{AlgoliaClient, DocsSearch};
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Nothing here changes per invocation except the SSE session table, which
/// belongs to the transport rather than to any tool.
pub struct AppState {
    pub search: DocsSearch,
    pub mcp: McpServer,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Initialize state with credentials read from the environment on every
    /// search.
    pub fn new(config: Config) -> Result<Self> {
        let client = AlgoliaClient::new(config.algolia_base_url.clone())?;
        let search = DocsSearch::new(client, CredentialSource::Environment);
        Ok(Self::with_search(config, search))
    }

    /// Initialize state around an already configured search adapter.
    pub fn with_search(config: Config, search: DocsSearch) -> Self {
        let registry = Arc::new(ToolRegistry::with_default_tools(search.clone()));
        tracing::info!(tools = registry.len(), "Tool registry initialized");

        let mcp = McpServer::new(
            registry,
            ServerInfo {
                name: config.server_name.clone(),
                version: config.server_version.clone(),
            },
        );

        Self {
            search,
            mcp,
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
        }
    }
}
