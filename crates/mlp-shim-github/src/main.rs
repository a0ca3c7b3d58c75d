// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-github`: GitHub MCP launcher.

use std::process::ExitCode;

use clap::Parser;
use mlp_shim_github::{DEFAULT_IMAGE, GithubConfig};
use mlp_supervisor::{Supervisor, probe, process_exit, run_step};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-github", version, about = "Launch the GitHub MCP server")]
struct Cli {
    /// GitHub Personal Access Token.
    #[arg(short = 't', long)]
    token: Option<String>,

    /// GitHub MCP Docker image.
    #[arg(short = 'i', long, default_value = DEFAULT_IMAGE)]
    docker_image: String,
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

    if !probe("docker").await {
        error!(target: "mlp.github", "Docker is not available. Please install Docker to use the GitHub MCP server.");
        error!(target: "mlp.github", "Visit https://docs.docker.com/get-docker/ for installation instructions.");
        return ExitCode::from(1);
    }

    let Some(token) = mlp_config::flag_env(cli.token, "GITHUB_PERSONAL_ACCESS_TOKEN") else {
        error!(target: "mlp.github", "GitHub Personal Access Token is required.");
        error!(target: "mlp.github", "Set GITHUB_PERSONAL_ACCESS_TOKEN environment variable or use --token flag");
        error!(target: "mlp.github", "To create a token:");
        error!(target: "mlp.github", "1. Go to GitHub Settings > Developer settings > Personal access tokens");
        error!(target: "mlp.github", "2. Generate a new token with \"repo\" scope");
        error!(target: "mlp.github", "3. Set the token as an environment variable or pass it with --token");
        return ExitCode::from(1);
    };

    let config = GithubConfig {
        token,
        docker_image: cli.docker_image,
    };

    info!(target: "mlp.github", "checking for Docker image: {}", config.docker_image);
    match run_step(config.pull_spec()).await {
        Ok(status) if status.success() => {
            info!(target: "mlp.github", "Docker image is ready");
        }
        Ok(status) => {
            warn!(target: "mlp.github", "could not update Docker image (pull exited with {status})");
            warn!(target: "mlp.github", "continuing with existing image...");
        }
        Err(err) => {
            warn!(target: "mlp.github", "could not update Docker image: {err}");
            warn!(target: "mlp.github", "continuing with existing image...");
        }
    }

    match Supervisor::new(config.launch_spec()).run().await {
        Ok(outcome) => process_exit(outcome.exit_code()),
        Err(err) => {
            error!(target: "mlp.github", "{err}");
            process_exit(err.exit_code())
        }
    }
}
