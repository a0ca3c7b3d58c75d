// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-memory`: the memory bank server over stdin/stdout.

use anyhow::Context;
use clap::Parser;
use mlp_memory::{MemoryBank, MemoryTools};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-memory", version, about = "Persistent memory bank tool server")]
struct Cli {
    /// Path to the memory storage file.
    #[arg(short = 'f', long)]
    memory_file: Option<String>,

    /// Maximum number of memories to store.
    #[arg(long, default_value_t = 1000)]
    max_memories: usize,
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

    let path = mlp_config::flag_env_or(cli.memory_file, "MEMORY_FILE_PATH", "./memory-bank.json");
    let bank = MemoryBank::open(&path, cli.max_memories)
        .with_context(|| format!("failed to open memory bank at {path}"))?;
    info!(target: "mlp.memory", "memory bank server is running with {} memories loaded", bank.len());
    info!(target: "mlp.memory", "memory file: {}", bank.path().display());

    let mut tools = MemoryTools::new(bank);
    mlp_protocol::serve_stdio(&mut tools).await?;
    Ok(())
}
