// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-thinking`: the sequential thinking server over stdin/stdout.

use clap::Parser;
use mlp_thinking::ThinkingServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-thinking", version, about = "Sequential thinking tool server")]
struct Cli {
    /// Disable logging of thought information.
    #[arg(long)]
    disable_thought_logging: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let log_thoughts =
        !(cli.disable_thought_logging || mlp_config::env_truthy("DISABLE_THOUGHT_LOGGING"));
    if log_thoughts {
        info!(target: "mlp.thinking", "sequential thinking server is running...");
    }

    let mut server = ThinkingServer::new(log_thoughts);
    mlp_protocol::serve_stdio(&mut server).await?;
    Ok(())
}
