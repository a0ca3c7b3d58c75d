// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-shim-everything
#![deny(unsafe_code)]
#![warn(missing_docs)]

use mlp_supervisor::LaunchSpec;

/// Display name used in lifecycle notices.
pub const SERVER_NAME: &str = "Everything MCP Server";

/// Resolved configuration for the Everything shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EverythingConfig {
    /// `stdio` or `http`.
    pub transport: String,
    /// HTTP port, exported in http transport mode.
    pub port: u16,
    /// HTTP host, exported in http transport mode.
    pub host: String,
    /// Whether to set DEBUG/MCP_DEBUG for the child.
    pub debug: bool,
}

impl EverythingConfig {
    /// The launch spec for this configuration. The everything server takes
    /// no transport flags of its own; http settings travel as environment
    /// variables.
    pub fn launch_spec(&self) -> LaunchSpec {
        let mut spec = LaunchSpec::new(SERVER_NAME, "npx")
            .arg("-y")
            .arg("@modelcontextprotocol/server-everything");
        if self.debug {
            spec = spec.env("DEBUG", "1").env("MCP_DEBUG", "1");
        }
        if self.transport == "http" {
            spec = spec
                .env("MCP_TRANSPORT", "http")
                .env("MCP_PORT", self.port.to_string())
                .env("MCP_HOST", &self.host);
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EverythingConfig {
        EverythingConfig {
            transport: "stdio".into(),
            port: 8080,
            host: "0.0.0.0".into(),
            debug: false,
        }
    }

    #[test]
    fn stdio_spec_has_no_overlay() {
        let spec = config().launch_spec();
        assert_eq!(spec.command, "npx");
        assert_eq!(spec.args, ["-y", "@modelcontextprotocol/server-everything"]);
        assert!(spec.env.is_empty());
    }

    #[test]
    fn debug_sets_both_flags() {
        let spec = EverythingConfig {
            debug: true,
            ..config()
        }
        .launch_spec();
        assert_eq!(spec.env["DEBUG"], "1");
        assert_eq!(spec.env["MCP_DEBUG"], "1");
    }

    #[test]
    fn http_exports_transport_env() {
        let spec = EverythingConfig {
            transport: "http".into(),
            port: 9000,
            ..config()
        }
        .launch_spec();
        assert_eq!(spec.env["MCP_TRANSPORT"], "http");
        assert_eq!(spec.env["MCP_PORT"], "9000");
        assert_eq!(spec.env["MCP_HOST"], "0.0.0.0");
    }
}
