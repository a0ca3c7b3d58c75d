// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-shim-github
#![deny(unsafe_code)]
#![warn(missing_docs)]

use mlp_supervisor::LaunchSpec;

/// Display name used in lifecycle notices.
pub const SERVER_NAME: &str = "GitHub MCP Server";

/// Default server image.
pub const DEFAULT_IMAGE: &str = "ghcr.io/github/github-mcp-server";

/// Resolved configuration for the GitHub shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// Personal access token, forwarded to the container.
    pub token: String,
    /// Docker image to run.
    pub docker_image: String,
}

impl GithubConfig {
    /// Best-effort image refresh step, run before the server.
    pub fn pull_spec(&self) -> LaunchSpec {
        LaunchSpec::new("docker pull", "docker")
            .arg("pull")
            .arg(&self.docker_image)
    }

    /// The launch spec: an interactive, auto-removed container with the
    /// token in its environment.
    pub fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec::new(SERVER_NAME, "docker")
            .args(["run", "-i", "--rm"])
            .arg("-e")
            .arg(format!("GITHUB_PERSONAL_ACCESS_TOKEN={}", self.token))
            .arg(&self.docker_image)
    }
}
