// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-fetch`: Fetch MCP launcher with method fallback.

use std::process::ExitCode;

use clap::Parser;
use mlp_shim_fetch::{DEFAULT_TIMEOUT, FetchConfig, Method};
use mlp_supervisor::{Supervisor, probe, process_exit};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-fetch", version, about = "Launch the Fetch MCP server")]
struct Cli {
    /// Ignore robots.txt restrictions.
    #[arg(long)]
    ignore_robots_txt: bool,

    /// Custom user agent string.
    #[arg(long, alias = "ua")]
    user_agent: Option<String>,

    /// Proxy URL for requests.
    #[arg(long, alias = "proxy")]
    proxy_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT)]
    timeout: u32,

    /// Preferred installation method.
    #[arg(short = 'm', long, value_enum, default_value_t = Method::Uvx)]
    method: Method,
}

async fn select_method(preferred: Method) -> Option<Method> {
    if probe(preferred.tool()).await {
        return Some(preferred);
    }
    warn!(
        target: "mlp.fetch",
        "preferred method '{preferred}' is not available, searching for alternatives..."
    );
    for candidate in Method::CANDIDATES {
        if candidate != preferred && probe(candidate.tool()).await {
            info!(target: "mlp.fetch", "using {candidate} for the fetch server");
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

    let Some(method) = select_method(cli.method).await else {
        error!(target: "mlp.fetch", "none of the required tools (uvx, docker, npx) are available");
        error!(target: "mlp.fetch", "- for uvx: pip install uv");
        error!(target: "mlp.fetch", "- for docker: https://docs.docker.com/get-docker/");
        error!(target: "mlp.fetch", "- for npx: npm install -g npm");
        return ExitCode::from(1);
    };

    let config = FetchConfig {
        ignore_robots_txt: cli.ignore_robots_txt,
        user_agent: cli.user_agent,
        proxy_url: cli.proxy_url,
        timeout: cli.timeout,
    };

    match Supervisor::new(config.launch_spec(method)).run().await {
        Ok(outcome) => process_exit(outcome.exit_code()),
        Err(err) => {
            error!(target: "mlp.fetch", "{err}");
            process_exit(err.exit_code())
        }
    }
}
