use std::env;
use std::fmt;

use crate::error::{AppError, Result};

/// Environment variable holding the Algolia application id.
pub const APP_ID_VAR: &str = "ALGOLIA_CF_APP_ID";
/// Environment variable holding the search-only API key.
pub const SEARCH_KEY_VAR: &str = "ALGOLIA_CF_SEARCH_KEY";
/// Environment variable holding the DocSearch index name.
pub const INDEX_VAR: &str = "ALGOLIA_CF_INDEX";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    /// Optional override for the upstream origin. When unset the
    /// per-application `https://{app_id}-dsn.algolia.net` host is used.
    pub algolia_base_url: Option<String>,
    /// Interval between keep-alive comments on `/sse` streams.
    pub sse_keep_alive_secs: u64,
    /// Name advertised in the `initialize` result.
    pub server_name: String,
    /// Version advertised in the `initialize` result.
    pub server_version: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Search credentials are deliberately not part of this struct; they are
    /// resolved per invocation through [`CredentialSource`].
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()?,
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            algolia_base_url: env::var("ALGOLIA_BASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            sse_keep_alive_secs: env::var("SSE_KEEP_ALIVE_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,
            server_name: env::var("MCP_SERVER_NAME")
                .unwrap_or_else(|_| env!("CARGO_PKG_NAME").to_string()),
            server_version: env::var("MCP_SERVER_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            shutdown_timeout_secs: 5,
            algolia_base_url: None,
            sse_keep_alive_secs: 15,
            server_name: env!("CARGO_PKG_NAME").to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Credentials for the DocSearch index. Treated as opaque secrets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SearchCredentials {
    pub application_id: String,
    pub api_key: String,
    pub index_name: String,
}

impl SearchCredentials {
    pub fn new(
        application_id: impl Into<String>,
        api_key: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            api_key: api_key.into(),
            index_name: index_name.into(),
        }
    }

    /// Read the three `ALGOLIA_CF_*` variables. Missing values become empty
    /// strings and are rejected later by [`SearchCredentials::validate`].
    pub fn from_env() -> Self {
        Self {
            application_id: env::var(APP_ID_VAR).unwrap_or_default(),
            api_key: env::var(SEARCH_KEY_VAR).unwrap_or_default(),
            index_name: env::var(INDEX_VAR).unwrap_or_default(),
        }
    }

    /// Fails with the name of the first missing variable.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (&self.application_id, APP_ID_VAR),
            (&self.api_key, SEARCH_KEY_VAR),
            (&self.index_name, INDEX_VAR),
        ];
        for (value, name) in fields {
            if value.trim().is_empty() {
                return Err(AppError::ConfigError(format!("Missing secret: {}", name)));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("application_id", &self.application_id)
            .field("api_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .finish()
    }
}

/// Where search credentials come from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Re-read the process environment on every invocation.
    Environment,
    /// Fixed credentials injected by the embedder.
    Fixed(SearchCredentials),
}

impl CredentialSource {
    pub fn resolve(&self) -> SearchCredentials {
        match self {
            CredentialSource::Environment => SearchCredentials::from_env(),
            CredentialSource::Fixed(credentials) => credentials.clone(),
        }
    }
}
