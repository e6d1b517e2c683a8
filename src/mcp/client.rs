//! JSON-RPC client and HTTP transport for the MCP server

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{JsonRpcRequest, ToolArguments, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST};
use crate::config::McpConfig;
use crate::error::McpError;
use crate::mcp::response::parse_response;
use crate::utils::{run_command_with_timeout, CommandResult};

/// A fully-specified HTTP POST
#[derive(Debug, Clone, PartialEq)]
pub struct HttpPost {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub timeout: Duration,
}

/// Sends an HTTP POST and returns the raw response body
pub trait Transport {
    fn post(&self, request: &HttpPost) -> Result<String, McpError>;
}

/// Transport that shells out to `curl`
#[derive(Debug, Clone)]
pub struct CurlTransport {
    program: PathBuf,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl CurlTransport {
    /// Use the `curl` found on `PATH`
    pub fn new() -> Self {
        let program = which::which("curl").unwrap_or_else(|_| PathBuf::from("curl"));
        Self { program }
    }

    /// Use a specific curl-compatible executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn build_args(request: &HttpPost) -> Vec<String> {
        let mut args = vec![
            "-sS".to_string(),
            "-X".to_string(),
            "POST".to_string(),
            request.url.clone(),
        ];
        for (name, value) in &request.headers {
            args.push("-H".to_string());
            args.push(format!("{}: {}", name, value));
        }
        args.push("--data-raw".to_string());
        args.push(request.body.clone());
        args
    }
}

impl Transport for CurlTransport {
    fn post(&self, request: &HttpPost) -> Result<String, McpError> {
        let args = Self::build_args(request);

        let result = run_command_with_timeout(&self.program, &args, request.timeout);
        if result.is_success() {
            return Ok(result.stdout_string().unwrap_or_default());
        }

        match result {
            CommandResult::TimedOut => Err(McpError::Timeout(request.timeout)),
            CommandResult::SpawnError(e) => Err(McpError::Spawn(e)),
            failed => Err(McpError::Transport {
                stderr: failed.stderr_string().unwrap_or_default().trim().to_string(),
            }),
        }
    }
}

/// Client for a single MCP endpoint
pub struct McpClient<T: Transport> {
    endpoint: String,
    token: String,
    timeout: Duration,
    transport: T,
}

impl<T: Transport> McpClient<T> {
    pub fn new(config: &McpConfig, transport: T) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            timeout: config.timeout,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the HTTP POST carrying `request`
    pub fn build_post(&self, request: &JsonRpcRequest) -> Result<HttpPost, McpError> {
        let body = request.to_json().map_err(McpError::Encode)?;

        Ok(HttpPost {
            url: self.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    "Accept".to_string(),
                    "application/json, text/event-stream".to_string(),
                ),
                ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ],
            body,
            timeout: self.timeout,
        })
    }

    /// Send one JSON-RPC request and return its result
    pub fn send(&self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        if self.token.is_empty() {
            return Err(McpError::MissingToken);
        }

        let request = JsonRpcRequest::new(method, params);
        let post = self.build_post(&request)?;
        let body = self.transport.post(&post)?;

        parse_response(&body)?.into_result()
    }

    pub fn list_tools(&self) -> Result<Value, McpError> {
        self.send(METHOD_TOOLS_LIST, None)
    }

    pub fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<Value, McpError> {
        self.send(
            METHOD_TOOLS_CALL,
            Some(json!({
                "name": name,
                "arguments": arguments.into_value()
            })),
        )
    }
}
