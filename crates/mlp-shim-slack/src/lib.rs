// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-shim-slack
#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::collections::BTreeMap;

use mlp_config::EnvOverlay;
use mlp_supervisor::LaunchSpec;

/// Display name used in lifecycle notices.
pub const SERVER_NAME: &str = "Slack MCP Server";

/// Upstream repository for the korotovsky implementation.
pub const KOROTOVSKY_REPO: &str = "https://github.com/korotovsky/slack-mcp-server.git";

/// Checkout location for the korotovsky implementation.
pub const KOROTOVSKY_DIR: &str = "/tmp/slack-mcp-server";

/// Which Slack MCP implementation to launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum Implementation {
    /// korotovsky/slack-mcp-server, built from source with Go.
    Korotovsky,
    /// AVIMBU/slack-mcp-server from npm.
    Avimbu,
}

/// Resolved configuration for the Slack shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackConfig {
    /// Browser token (xoxc-...).
    pub xoxc_token: Option<String>,
    /// Browser cookie d (xoxd-...).
    pub xoxd_token: Option<String>,
    /// User OAuth token (xoxp-...), alternative to the browser pair.
    pub xoxp_token: Option<String>,
    /// `stdio` or `sse`.
    pub transport: String,
    /// Port for the SSE transport.
    pub port: u16,
    /// Host for the SSE transport.
    pub host: String,
    /// Bearer token for the SSE transport.
    pub sse_api_key: Option<String>,
    /// Proxy URL for outgoing requests.
    pub proxy: Option<String>,
    /// Custom User-Agent for Enterprise Slack environments.
    pub user_agent: Option<String>,
    /// Message posting policy (true for all, or comma-separated channel ids).
    pub enable_messaging: Option<String>,
    /// Log level handed to the server.
    pub log_level: String,
}

impl SlackConfig {
    /// Whether authentication is sufficient: a user OAuth token, or both
    /// browser tokens.
    pub fn has_credentials(&self) -> bool {
        self.xoxp_token.is_some() || (self.xoxc_token.is_some() && self.xoxd_token.is_some())
    }

    /// `SLACK_MCP_*` overlay shared by both implementations.
    pub fn env_overlay(&self) -> BTreeMap<String, String> {
        EnvOverlay::new()
            .set_opt("SLACK_MCP_XOXC_TOKEN", self.xoxc_token.clone())
            .set_opt("SLACK_MCP_XOXD_TOKEN", self.xoxd_token.clone())
            .set_opt("SLACK_MCP_XOXP_TOKEN", self.xoxp_token.clone())
            .set("SLACK_MCP_PORT", self.port.to_string())
            .set("SLACK_MCP_HOST", &self.host)
            .set_opt("SLACK_MCP_SSE_API_KEY", self.sse_api_key.clone())
            .set_opt("SLACK_MCP_PROXY", self.proxy.clone())
            .set_opt("SLACK_MCP_USER_AGENT", self.user_agent.clone())
            .set_opt("SLACK_MCP_ADD_MESSAGE_TOOL", self.enable_messaging.clone())
            .set("SLACK_MCP_LOG_LEVEL", &self.log_level)
            .into_map()
    }

    /// Pre-launch step for the korotovsky implementation: clone the
    /// upstream repository. Git exits 128 when the checkout already exists;
    /// callers treat that as success.
    pub fn clone_spec(&self) -> LaunchSpec {
        LaunchSpec::new("git clone", "git")
            .args(["clone", KOROTOVSKY_REPO, KOROTOVSKY_DIR])
    }

    /// The launch spec for the given implementation.
    pub fn launch_spec(&self, implementation: Implementation) -> LaunchSpec {
        match implementation {
            Implementation::Korotovsky => {
                let transport = if self.transport == "sse" { "sse" } else { "stdio" };
                LaunchSpec::new(SERVER_NAME, "go")
                    .arg("run")
                    .arg(format!("{KOROTOVSKY_DIR}/mcp/mcp-server.go"))
                    .args(["--transport", transport])
                    .envs(self.env_overlay())
                    .cwd(KOROTOVSKY_DIR)
            }
            Implementation::Avimbu => LaunchSpec::new(SERVER_NAME, "npx")
                .args(["-y", "slack-mcp-server"])
                .envs(self.env_overlay()),
        }
    }
}
