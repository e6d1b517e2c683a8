//! Response decoding for MCP calls.
//!
//! The server answers either with one JSON document or with an event-stream
//! body (`event: message` followed by a `data: {...}` line). Both decode to a
//! JSON-RPC envelope which is then split into success or error.

use serde_json::Value;

use crate::error::McpError;

const EVENT_PREFIX: &str = "event:";
const DATA_PREFIX: &str = "data:";

/// Outcome of a single JSON-RPC exchange
#[derive(Debug, Clone, PartialEq)]
pub enum RpcOutcome {
    Success(Value),
    Error(Value),
}

impl RpcOutcome {
    /// Split a decoded document.
    ///
    /// Any `error` key makes the outcome an error. Otherwise the `result`
    /// field is returned, or the whole document for servers that skip the
    /// envelope.
    pub fn from_document(document: Value) -> Self {
        match document {
            Value::Object(mut map) => {
                if let Some(error) = map.remove("error") {
                    return RpcOutcome::Error(error);
                }
                match map.remove("result") {
                    Some(result) => RpcOutcome::Success(result),
                    None => RpcOutcome::Success(Value::Object(map)),
                }
            }
            other => RpcOutcome::Success(other),
        }
    }

    pub fn into_result(self) -> Result<Value, McpError> {
        match self {
            RpcOutcome::Success(value) => Ok(value),
            RpcOutcome::Error(detail) => Err(McpError::Remote(detail)),
        }
    }
}

/// Decode a raw response body into a JSON document
pub fn decode_body(body: &str) -> Result<Value, McpError> {
    let trimmed = body.trim();

    let payload = if trimmed.starts_with(EVENT_PREFIX) {
        trimmed
            .lines()
            .find_map(|line| line.strip_prefix(DATA_PREFIX))
            .map(str::trim)
            .ok_or(McpError::MissingSseData)?
    } else {
        trimmed
    };

    serde_json::from_str(payload).map_err(|source| McpError::InvalidJson {
        source,
        output: body.to_string(),
    })
}

/// Decode a raw body and classify it
pub fn parse_response(body: &str) -> Result<RpcOutcome, McpError> {
    decode_body(body).map(RpcOutcome::from_document)
}
