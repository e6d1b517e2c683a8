use crate::error::McpError;
use crate::mcp::{McpClient, Transport};
use crate::output;

pub fn run<T: Transport>(client: &McpClient<T>) -> Result<(), McpError> {
    let result = client.list_tools()?;
    output::print_result(&result);
    Ok(())
}
