//! Configuration module for cnb-mcp
//! Locates an optional `.env` file, merges it with the process environment and
//! produces the `McpConfig` used for a single MCP call.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::McpError;
use crate::output;
use crate::utils::DEFAULT_COMMAND_TIMEOUT;

/// Default env file name
pub const ENV_FILE: &str = ".env";

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "CNB_TOKEN";

/// Key overriding the MCP endpoint
pub const ENDPOINT_KEY: &str = "CNB_MCP_URL";

/// MCP endpoint used when no override is configured
pub const DEFAULT_ENDPOINT: &str = "https://mcp.cnb.cool/mcp";

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, the line is split on the first
/// `=`, both sides are trimmed and one pair of matching `"` or `'` quotes is
/// removed from the value. Entries with an empty key or value are dropped and
/// later keys overwrite earlier ones.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let value = unquote(value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        vars.insert(key.to_string(), value.to_string());
    }

    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// A parsed env file and where it came from
#[derive(Debug, Clone)]
pub struct EnvFile {
    pub path: PathBuf,
    pub vars: HashMap<String, String>,
}

impl EnvFile {
    /// Load an env file, `Ok(None)` if it does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read env file: {}", path.display()))?;

        Ok(Some(Self {
            path: path.to_path_buf(),
            vars: parse_env_file(&content),
        }))
    }

    /// Return the first candidate that exists and can be read.
    ///
    /// Unreadable files are reported as warnings and skipped; the files are
    /// never merged.
    pub fn search(candidates: &[PathBuf]) -> Option<Self> {
        for path in candidates {
            match Self::load_from(path) {
                Ok(Some(file)) => return Some(file),
                Ok(None) => continue,
                Err(e) => output::warn(&format!("{:#}", e)),
            }
        }
        None
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Candidate env file locations: working directory, the executable's
/// directory, then the directory above it.
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(ENV_FILE));
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join(ENV_FILE));
        if let Some(parent) = exe_dir.parent() {
            paths.push(parent.join(ENV_FILE));
        }
    }

    paths
}

/// Where the token was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    EnvFile(PathBuf),
    Environment,
}

/// Resolved settings for one MCP call
#[derive(Debug, Clone)]
pub struct McpConfig {
    pub token: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub token_source: TokenSource,
}

impl McpConfig {
    /// Merge an optional env file with an environment lookup.
    ///
    /// File values win over the environment; empty environment values count
    /// as unset.
    pub fn resolve<F>(env_file: Option<&EnvFile>, lookup: F) -> Result<Self, McpError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let from_file = env_file.and_then(|f| f.get(TOKEN_KEY).map(|token| (token, f)));

        let (token, token_source) = match from_file {
            Some((token, file)) => (token.to_string(), TokenSource::EnvFile(file.path.clone())),
            None => match from_env(TOKEN_KEY) {
                Some(token) => (token, TokenSource::Environment),
                None => return Err(McpError::MissingToken),
            },
        };

        let endpoint = env_file
            .and_then(|f| f.get(ENDPOINT_KEY))
            .map(str::to_string)
            .or_else(|| from_env(ENDPOINT_KEY))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            token,
            endpoint,
            timeout: DEFAULT_COMMAND_TIMEOUT,
            token_source,
        })
    }

    /// Resolve from the real environment.
    ///
    /// With `explicit_env_file` only that file is consulted; otherwise the
    /// default search paths are tried in order.
    pub fn load(explicit_env_file: Option<&Path>) -> Result<Self, McpError> {
        let env_file = match explicit_env_file {
            Some(path) => match EnvFile::load_from(path) {
                Ok(Some(file)) => Some(file),
                Ok(None) => {
                    output::warn(&format!("env file not found: {}", path.display()));
                    None
                }
                Err(e) => {
                    output::warn(&format!("{:#}", e));
                    None
                }
            },
            None => EnvFile::search(&default_search_paths()),
        };

        Self::resolve(env_file.as_ref(), |key| std::env::var(key).ok())
    }

    /// Token with everything after the first four characters hidden; tokens
    /// of eight characters or fewer are hidden entirely
    pub fn masked_token(&self) -> String {
        if self.token.chars().count() <= 8 {
            return "****".to_string();
        }
        let prefix: String = self.token.chars().take(4).collect();
        format!("{}****", prefix)
    }
}
