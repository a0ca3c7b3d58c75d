// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-everything`: Everything reference MCP launcher.

use std::process::ExitCode;

use clap::Parser;
use mlp_shim_everything::EverythingConfig;
use mlp_supervisor::{Supervisor, probe, process_exit};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mcp-everything",
    version,
    about = "Launch the Everything reference MCP server"
)]
struct Cli {
    /// Transport type (stdio or http).
    #[arg(short = 't', long, value_parser = ["stdio", "http"], default_value = "stdio")]
    transport: String,

    /// HTTP server port (when using http transport).
    #[arg(short = 'p', long, default_value_t = 8080)]
    port: u16,

    /// HTTP server host (when using http transport).
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Enable debug mode.
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !probe("npx").await {
        error!(target: "mlp.everything", "npx is not available. Please install Node.js and npm.");
        error!(target: "mlp.everything", "Visit https://nodejs.org/ for installation instructions.");
        return ExitCode::from(1);
    }

    if cli.transport == "http" {
        info!(target: "mlp.everything", "http transport mode on {}:{}", cli.host, cli.port);
    }

    let config = EverythingConfig {
        transport: cli.transport,
        port: cli.port,
        host: cli.host,
        debug: cli.debug,
    };

    match Supervisor::new(config.launch_spec()).run().await {
        Ok(outcome) => process_exit(outcome.exit_code()),
        Err(err) => {
            error!(target: "mlp.everything", "{err}");
            error!(target: "mlp.everything", "Make sure npm/npx is installed and accessible in your PATH");
            process_exit(err.exit_code())
        }
    }
}
