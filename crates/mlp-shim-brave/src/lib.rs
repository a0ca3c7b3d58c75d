// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-shim-brave
#![deny(unsafe_code)]
#![warn(missing_docs)]

use mlp_supervisor::LaunchSpec;

/// Display name used in lifecycle notices.
pub const SERVER_NAME: &str = "Brave Search MCP Server";

/// Resolved configuration for the Brave shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraveConfig {
    /// Brave Search API key.
    pub api_key: String,
    /// `stdio` or `http`.
    pub transport: String,
    /// HTTP port, used in http transport mode.
    pub port: u16,
    /// HTTP host, used in http transport mode.
    pub host: String,
}

impl BraveConfig {
    /// The launch spec for this configuration.
    pub fn launch_spec(&self) -> LaunchSpec {
        let mut spec = LaunchSpec::new(SERVER_NAME, "npx")
            .arg("-y")
            .arg("@brave/brave-search-mcp-server");
        if self.transport == "http" {
            spec = spec
                .arg("--transport")
                .arg("http")
                .arg("--port")
                .arg(self.port.to_string())
                .arg("--host")
                .arg(&self.host);
        } else {
            spec = spec.arg("--transport").arg("stdio");
        }
        spec.env("BRAVE_API_KEY", &self.api_key)
            .env("BRAVE_MCP_TRANSPORT", &self.transport)
            .env("BRAVE_MCP_PORT", self.port.to_string())
            .env("BRAVE_MCP_HOST", &self.host)
    }
}
