//! cf-docs-mcp - MCP tool server for Cloudflare Docs search
//!
//! This library exposes the search adapter, the tool registry and the HTTP
//! transports, enabling integration tests and embedding in other services.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod rpc;
pub mod search;
pub mod state;
pub mod tools;

// Re-export key types for convenience
pub use config::{Config, CredentialSource, SearchCredentials};
pub use error::{AppError, Result, ToolError};
pub use routes::create_router;
pub use search::{AlgoliaClient, DocsSearch, SearchResult};
pub use state::AppState;
pub use tools::{Tool, ToolRegistry, ToolResponse};
