//! MCP server surface: JSON-RPC 2.0 protocol types, the stdio serve loop,
//! and the conversation tool handlers.

pub mod error;
pub mod handlers;
pub mod stdio;
pub mod tools;
pub mod types;

pub use error::{Error, Result};
pub use handlers::{ToolContext, default_router};
pub use stdio::McpServer;
pub use tools::{ToolHandler, ToolRouter};
