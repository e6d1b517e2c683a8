//! Terminal output for cnb-mcp
//! Results go to stdout as pretty JSON; diagnostics go to stderr.

use colored::Colorize;
use serde_json::Value;

use crate::error::McpError;

/// Pretty-print a JSON value with two-space indentation
pub fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print a successful result on stdout
pub fn print_result(value: &Value) {
    println!("{}", to_pretty_json(value));
}

/// Print the structured diagnostic for `err` on stderr
pub fn print_error(err: &McpError) {
    eprintln!("{}", to_pretty_json(&err.to_json()));
}

/// Non-fatal warning on stderr
pub fn warn(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Verbose trace line on stderr
pub fn info(message: &str) {
    eprintln!("{} {}", "→".cyan(), message.dimmed());
}
