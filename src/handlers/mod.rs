pub mod health;
pub mod mcp;
pub mod sse;
pub mod test_search;

pub use health::health_handler;
pub use mcp::mcp_handler;
pub use sse::{sse_handler, sse_message_handler};
pub use test_search::test_search_handler;
