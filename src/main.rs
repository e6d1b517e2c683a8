use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cnb_mcp::config::TokenSource;
use cnb_mcp::{commands, output, CurlTransport, McpClient, McpConfig, McpError};

/// cnb-mcp - call the CNB MCP server from the command line
/// Reads CNB_TOKEN from a .env file or the environment.
#[derive(Parser)]
#[command(name = "cnb-mcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Read settings from this file instead of searching for .env
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Print the endpoint and token source to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all tools exposed by the MCP server
    ListTools,

    /// Call a tool with key=value arguments
    Call {
        /// Tool name (e.g. "list-repos")
        tool: String,

        /// Arguments as key=value; values that parse as JSON are sent as JSON
        args: Vec<String>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout with exit 0; usage errors exit 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), McpError> {
    let config = McpConfig::load(cli.env_file.as_deref())?;

    if cli.verbose {
        let source = match &config.token_source {
            TokenSource::EnvFile(path) => path.display().to_string(),
            TokenSource::Environment => "environment".to_string(),
        };
        output::info(&format!("endpoint: {}", config.endpoint));
        output::info(&format!("token: {} (from {})", config.masked_token(), source));
    }

    let client = McpClient::new(&config, CurlTransport::new());

    if cli.verbose {
        output::info(&format!("transport: {}", client.transport().program().display()));
    }

    match cli.command {
        Commands::ListTools => commands::list_tools::run(&client),
        Commands::Call { tool, args } => commands::call::run(&client, &tool, &args),
    }
}
