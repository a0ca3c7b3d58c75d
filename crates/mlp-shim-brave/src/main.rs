// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-brave`: Brave Search MCP launcher.

use std::process::ExitCode;

use clap::Parser;
use mlp_shim_brave::BraveConfig;
use mlp_supervisor::Supervisor;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-brave", version, about = "Launch the Brave Search MCP server")]
struct Cli {
    /// Brave Search API key.
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Transport mode (stdio or http).
    #[arg(short = 't', long, value_parser = ["stdio", "http"])]
    transport: Option<String>,

    /// HTTP server port (when using http transport).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// HTTP server host (when using http transport).
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(api_key) = mlp_config::flag_env(cli.api_key, "BRAVE_API_KEY") else {
        error!(target: "mlp.brave", "Brave Search API key is required.");
        error!(target: "mlp.brave", "Set BRAVE_API_KEY environment variable or use --api-key flag");
        error!(target: "mlp.brave", "To get an API key:");
        error!(target: "mlp.brave", "1. Sign up at https://brave.com/search/api/");
        error!(target: "mlp.brave", "2. Generate your API key from the developer dashboard");
        error!(target: "mlp.brave", "3. Set the key as an environment variable or pass it with --api-key");
        return ExitCode::from(1);
    };

    let port = match mlp_config::flag_env_or_parse(cli.port, "BRAVE_MCP_PORT", 8080) {
        Ok(port) => port,
        Err(err) => {
            error!(target: "mlp.brave", "{err}");
            return ExitCode::from(1);
        }
    };
    let config = BraveConfig {
        api_key,
        transport: mlp_config::flag_env_or(cli.transport, "BRAVE_MCP_TRANSPORT", "stdio"),
        port,
        host: mlp_config::flag_env_or(cli.host, "BRAVE_MCP_HOST", "0.0.0.0"),
    };

    match Supervisor::new(config.launch_spec()).run().await {
        Ok(outcome) => mlp_supervisor::process_exit(outcome.exit_code()),
        Err(err) => {
            error!(target: "mlp.brave", "{err}");
            error!(target: "mlp.brave", "Make sure npm/npx is installed and accessible in your PATH");
            mlp_supervisor::process_exit(err.exit_code())
        }
    }
}
