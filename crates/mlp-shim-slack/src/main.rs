// SPDX-License-Identifier: MIT OR Apache-2.0
//! `mcp-slack`: Slack MCP launcher.

use std::process::ExitCode;

use clap::Parser;
use mlp_shim_slack::{Implementation, SlackConfig};
use mlp_supervisor::{Supervisor, probe, probe_with_args, process_exit, run_step};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-slack", version, about = "Launch a Slack MCP server")]
struct Cli {
    /// Slack browser token (xoxc-...).
    #[arg(long, alias = "xoxc")]
    xoxc_token: Option<String>,

    /// Slack browser cookie d (xoxd-...).
    #[arg(long, alias = "xoxd")]
    xoxd_token: Option<String>,

    /// User OAuth token (xoxp-...) - alternative to xoxc/xoxd.
    #[arg(long, alias = "xoxp")]
    xoxp_token: Option<String>,

    /// Transport mode (stdio or sse).
    #[arg(short = 't', long, value_parser = ["stdio", "sse"], default_value = "stdio")]
    transport: String,

    /// Port for the MCP server (for SSE transport).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Host for the MCP server (for SSE transport).
    #[arg(long)]
    host: Option<String>,

    /// Bearer token for SSE transport.
    #[arg(long, alias = "key")]
    sse_api_key: Option<String>,

    /// Proxy URL for outgoing requests.
    #[arg(long, alias = "px")]
    proxy: Option<String>,

    /// Custom User-Agent for Enterprise Slack environments.
    #[arg(long, alias = "ua")]
    user_agent: Option<String>,

    /// Enable message posting (true for all, channel IDs comma-separated).
    #[arg(long, alias = "msg")]
    enable_messaging: Option<String>,

    /// Log level (debug, info, warn, error).
    #[arg(long, alias = "log", value_parser = ["debug", "info", "warn", "error"])]
    log_level: Option<String>,

    /// Slack MCP implementation to use.
    #[arg(long, alias = "impl", value_enum, default_value_t = Implementation::Korotovsky)]
    implementation: Implementation,
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

    let port = match mlp_config::flag_env_or_parse(cli.port, "SLACK_MCP_PORT", 13080) {
        Ok(port) => port,
        Err(err) => {
            error!(target: "mlp.slack", "{err}");
            return ExitCode::from(1);
        }
    };
    let config = SlackConfig {
        xoxc_token: mlp_config::flag_env(cli.xoxc_token, "SLACK_MCP_XOXC_TOKEN"),
        xoxd_token: mlp_config::flag_env(cli.xoxd_token, "SLACK_MCP_XOXD_TOKEN"),
        xoxp_token: mlp_config::flag_env(cli.xoxp_token, "SLACK_MCP_XOXP_TOKEN"),
        transport: cli.transport,
        port,
        host: mlp_config::flag_env_or(cli.host, "SLACK_MCP_HOST", "127.0.0.1"),
        sse_api_key: mlp_config::flag_env(cli.sse_api_key, "SLACK_MCP_SSE_API_KEY"),
        proxy: mlp_config::flag_env(cli.proxy, "SLACK_MCP_PROXY"),
        user_agent: mlp_config::flag_env(cli.user_agent, "SLACK_MCP_USER_AGENT"),
        enable_messaging: mlp_config::flag_env(cli.enable_messaging, "SLACK_MCP_ADD_MESSAGE_TOOL"),
        log_level: mlp_config::flag_env_or(cli.log_level, "SLACK_MCP_LOG_LEVEL", "info"),
    };

    if !config.has_credentials() {
        error!(target: "mlp.slack", "Slack authentication tokens are required.");
        error!(target: "mlp.slack", "You need either:");
        error!(target: "mlp.slack", "  1. User OAuth token (xoxp): --xoxp-token or SLACK_MCP_XOXP_TOKEN");
        error!(target: "mlp.slack", "  2. Both browser tokens: --xoxc-token + --xoxd-token or SLACK_MCP_XOXC_TOKEN + SLACK_MCP_XOXD_TOKEN");
        error!(target: "mlp.slack", "For setup instructions, visit:");
        error!(target: "mlp.slack", "https://github.com/korotovsky/slack-mcp-server/blob/master/docs/01-authentication-setup.md");
        return ExitCode::from(1);
    }

    if config.transport == "sse" {
        info!(target: "mlp.slack", "SSE transport mode on {}:{}", config.host, config.port);
        if config.sse_api_key.is_some() {
            info!(target: "mlp.slack", "authentication required for SSE transport");
        }
    }

    match cli.implementation {
        Implementation::Korotovsky => {
            // `go version`, not `go --version`.
            if !probe_with_args("go", &["version"]).await {
                error!(target: "mlp.slack", "Go is not available. Please install Go to use the korotovsky Slack MCP server.");
                error!(target: "mlp.slack", "Visit https://golang.org/dl/ for installation instructions.");
                return ExitCode::from(1);
            }
            info!(target: "mlp.slack", "cloning and building korotovsky/slack-mcp-server...");
            info!(target: "mlp.slack", "this may take a moment on first run");
            match run_step(config.clone_spec()).await {
                // 128: the checkout already exists.
                Ok(status) if status.code() == Some(0) || status.code() == Some(128) => {}
                Ok(status) => {
                    error!(target: "mlp.slack", "failed to clone repository (git exited with {status})");
                    return ExitCode::from(1);
                }
                Err(err) => {
                    error!(target: "mlp.slack", "failed to clone repository: {err}");
                    return ExitCode::from(1);
                }
            }
        }
        Implementation::Avimbu => {
            if !probe("npx").await {
                error!(target: "mlp.slack", "npx is not available. Please install Node.js and npm.");
                error!(target: "mlp.slack", "Visit https://nodejs.org/ for installation instructions.");
                return ExitCode::from(1);
            }
            info!(target: "mlp.slack", "using AVIMBU/slack-mcp-server implementation...");
        }
    }

    match Supervisor::new(config.launch_spec(cli.implementation)).run().await {
        Ok(outcome) => process_exit(outcome.exit_code()),
        Err(err) => {
            error!(target: "mlp.slack", "{err}");
            process_exit(err.exit_code())
        }
    }
}
