//! cnb-mcp - command-line client for the CNB MCP server
//! This library resolves the CNB token from `.env` files and the environment,
//! sends a single JSON-RPC request to the MCP endpoint and decodes the reply.

pub mod commands;
pub mod config;
pub mod error;
pub mod mcp;
pub mod output;
pub mod utils;

// Re-export main types for convenience
pub use config::{EnvFile, McpConfig, TokenSource};
pub use error::McpError;
pub use mcp::{CurlTransport, McpClient, RpcOutcome, ToolArguments, Transport};
