// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-notion`: Notion MCP launcher with method fallback.

use std::process::ExitCode;

use clap::Parser;
use mlp_shim_notion::{DEFAULT_PORT, Method, NotionConfig};
use mlp_supervisor::{Supervisor, probe, process_exit};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-notion", version, about = "Launch the Notion MCP server")]
struct Cli {
    /// Notion integration token.
    #[arg(short = 't', long)]
    token: Option<String>,

    /// Transport mode (stdio or http).
    #[arg(long, value_parser = ["stdio", "http"], default_value = "stdio")]
    transport: String,

    /// HTTP server port (when using http transport).
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// HTTP auth token (when using http transport).
    #[arg(long, alias = "auth")]
    auth_token: Option<String>,

    /// Custom headers as a JSON string (advanced use).
    #[arg(long)]
    headers: Option<String>,

    /// Installation method.
    #[arg(short = 'm', long, value_enum, default_value_t = Method::Npm)]
    method: Method,
}

async fn select_method(preferred: Method) -> Option<Method> {
    if probe(preferred.tool()).await {
        return Some(preferred);
    }
    warn!(
        target: "mlp.notion",
        "preferred method '{preferred}' is not available, searching for alternatives..."
    );
    for candidate in Method::CANDIDATES {
        if candidate != preferred && probe(candidate.tool()).await {
            info!(target: "mlp.notion", "using {candidate} for the Notion server");
            return Some(candidate);
        }
    }
    None
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

    let config = NotionConfig {
        token: mlp_config::flag_env(cli.token, "NOTION_TOKEN"),
        headers: mlp_config::flag_env(cli.headers, "OPENAPI_MCP_HEADERS"),
        transport: cli.transport,
        port: cli.port,
        auth_token: mlp_config::flag_env(cli.auth_token, "AUTH_TOKEN"),
    };

    if !config.has_credentials() {
        error!(target: "mlp.notion", "Notion integration token is required.");
        error!(target: "mlp.notion", "Set NOTION_TOKEN environment variable or use --token flag");
        error!(target: "mlp.notion", "To create a token:");
        error!(target: "mlp.notion", "1. Go to https://www.notion.so/profile/integrations");
        error!(target: "mlp.notion", "2. Create a new internal integration");
        error!(target: "mlp.notion", "3. Copy the integration token");
        error!(target: "mlp.notion", "4. Connect the integration to your Notion pages");
        return ExitCode::from(1);
    }

    let Some(method) = select_method(cli.method).await else {
        error!(target: "mlp.notion", "none of the required tools (npx, docker) are available");
        return ExitCode::from(1);
    };

    match Supervisor::new(config.launch_spec(method)).run().await {
        Ok(outcome) => process_exit(outcome.exit_code()),
        Err(err) => {
            error!(target: "mlp.notion", "{err}");
            match method {
                Method::Npm => {
                    error!(target: "mlp.notion", "Make sure npm/npx is installed and accessible in your PATH");
                }
                Method::DockerOfficial | Method::DockerLocal => {
                    error!(target: "mlp.notion", "Make sure Docker is installed and running");
                }
            }
            process_exit(err.exit_code())
        }
    }
}
