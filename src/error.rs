//! Error taxonomy for MCP calls
//! Every variant is terminal for the process and renders to a JSON diagnostic.

use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::TOKEN_KEY;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("CNB_TOKEN is not set")]
    MissingToken,

    #[error("{0}")]
    Spawn(String),

    #[error("curl failed: {stderr}")]
    Transport { stderr: String },

    #[error("MCP call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("SSE response contains no data line")]
    MissingSseData,

    #[error("JSON parse failed: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        output: String,
    },

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("MCP server returned an error")]
    Remote(Value),
}

impl McpError {
    /// Structured diagnostic printed on stderr before exiting
    pub fn to_json(&self) -> Value {
        match self {
            McpError::MissingToken => json!({
                "error": self.to_string(),
                "hint": format!(
                    "Set the {TOKEN_KEY} environment variable or add {TOKEN_KEY}=your_token to a .env file"
                )
            }),
            McpError::InvalidJson { output, .. } => json!({
                "error": self.to_string(),
                "output": output
            }),
            McpError::Remote(detail) => json!({ "error": detail }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}
