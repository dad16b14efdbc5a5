pub mod message;
pub mod server;
pub mod session;

pub use message::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::{McpServer, ServerInfo, SUPPORTED_PROTOCOL_VERSIONS};
pub use session::{SessionGuard, SessionStore};
