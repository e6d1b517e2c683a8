//! `cnb-mcp call <tool> [key=value ...]`

use crate::error::McpError;
use crate::mcp::{McpClient, ToolArguments, Transport};
use crate::output;

pub fn run<T: Transport>(
    client: &McpClient<T>,
    tool: &str,
    pairs: &[String],
) -> Result<(), McpError> {
    let (arguments, skipped) = ToolArguments::parse(pairs);

    for arg in &skipped {
        output::warn(&format!("ignoring argument without '=': {}", arg));
    }

    let result = client.call_tool(tool, arguments)?;
    output::print_result(&result);
    Ok(())
}
