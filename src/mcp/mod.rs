//! MCP client for cnb-mcp
//! Builds JSON-RPC 2.0 requests for the remote MCP server and decodes its
//! plain-JSON or event-stream responses.

pub mod arguments;
pub mod client;
pub mod response;

use serde::Serialize;
use serde_json::Value;

pub use arguments::{coerce_value, ToolArguments};
pub use client::{CurlTransport, HttpPost, McpClient, Transport};
pub use response::{decode_body, parse_response, RpcOutcome};

pub const JSONRPC_VERSION: &str = "2.0";

/// Only one request is ever in flight, so the id is fixed
pub const REQUEST_ID: u64 = 1;

pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// JSON-RPC request structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request; `params` that are null or an empty object are omitted.
    pub fn new(method: &str, params: Option<Value>) -> Self {
        let params = params.filter(|p| match p {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        });

        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: REQUEST_ID,
            method: method.to_string(),
            params,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
