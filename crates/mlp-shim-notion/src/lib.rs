// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-shim-notion
#![deny(unsafe_code)]
#![warn(missing_docs)]

use mlp_config::EnvOverlay;
use mlp_supervisor::LaunchSpec;

/// Display name used in lifecycle notices.
pub const SERVER_NAME: &str = "Notion MCP Server";

/// Default HTTP port; omitted from the child's arguments.
pub const DEFAULT_PORT: u16 = 3000;

/// Installation method for the Notion server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum Method {
    /// `npx -y @notionhq/notion-mcp-server`.
    Npm,
    /// Official image: `docker run --rm -i mcp/notion`, credentials passed
    /// by name through the environment.
    DockerOfficial,
    /// Locally built image with credentials inlined into `-e` flags.
    DockerLocal,
}

impl Method {
    /// Fallback order when the preferred method's tool is missing.
    pub const CANDIDATES: [Method; 3] = [Method::Npm, Method::DockerOfficial, Method::DockerLocal];

    /// The tool whose availability gates this method.
    pub fn tool(self) -> &'static str {
        match self {
            Method::Npm => "npx",
            Method::DockerOfficial | Method::DockerLocal => "docker",
        }
    }

    /// Name as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Method::Npm => "npm",
            Method::DockerOfficial => "docker-official",
            Method::DockerLocal => "docker-local",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved configuration for the Notion shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionConfig {
    /// Notion integration token.
    pub token: Option<String>,
    /// Raw OpenAPI headers, an alternative to the token.
    pub headers: Option<String>,
    /// `stdio` or `http`.
    pub transport: String,
    /// HTTP port.
    pub port: u16,
    /// HTTP auth token.
    pub auth_token: Option<String>,
}

impl NotionConfig {
    /// Whether the shim has credentials to hand the server.
    pub fn has_credentials(&self) -> bool {
        self.token.is_some() || self.headers.is_some()
    }

    fn http(&self) -> bool {
        self.transport == "http"
    }

    /// Transport arguments appended after the package/image.
    pub fn server_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.http() {
            args.push("--transport".to_string());
            args.push("http".to_string());
            if self.port != DEFAULT_PORT {
                args.push("--port".to_string());
                args.push(self.port.to_string());
            }
            if let Some(auth) = &self.auth_token {
                args.push("--auth-token".to_string());
                args.push(auth.clone());
            }
        } else {
            args.push("--transport".to_string());
            args.push("stdio".to_string());
        }
        args
    }

    /// Credential overlay for methods that read them from the environment.
    pub fn env_overlay(&self) -> EnvOverlay {
        EnvOverlay::new()
            .set_opt("NOTION_TOKEN", self.token.clone())
            .set_opt("OPENAPI_MCP_HEADERS", self.headers.clone())
            .set_opt(
                "AUTH_TOKEN",
                self.auth_token.clone().filter(|_| self.http()),
            )
    }

    /// The launch spec for the given method.
    pub fn launch_spec(&self, method: Method) -> LaunchSpec {
        match method {
            Method::Npm => LaunchSpec::new(SERVER_NAME, "npx")
                .args(["-y", "@notionhq/notion-mcp-server"])
                .args(self.server_args())
                .envs(self.env_overlay().into_map()),
            Method::DockerOfficial => {
                let mut spec = LaunchSpec::new(SERVER_NAME, "docker").args(["run", "--rm", "-i"]);
                if self.token.is_some() {
                    spec = spec.args(["-e", "NOTION_TOKEN"]);
                }
                if self.headers.is_some() {
                    spec = spec.args(["-e", "OPENAPI_MCP_HEADERS"]);
                }
                if self.auth_token.is_some() && self.http() {
                    spec = spec.args(["-e", "AUTH_TOKEN"]);
                }
                spec.arg("mcp/notion")
                    .args(self.server_args())
                    .envs(self.env_overlay().into_map())
            }
            Method::DockerLocal => {
                let mut spec = LaunchSpec::new(SERVER_NAME, "docker").args(["run", "--rm", "-i"]);
                if let Some(token) = &self.token {
                    spec = spec.arg("-e").arg(format!("NOTION_TOKEN={token}"));
                }
                if let Some(headers) = &self.headers {
                    spec = spec.arg("-e").arg(format!("OPENAPI_MCP_HEADERS={headers}"));
                }
                if let Some(auth) = &self.auth_token {
                    if self.http() {
                        spec = spec.arg("-e").arg(format!("AUTH_TOKEN={auth}"));
                    }
                }
                spec.arg("notion-mcp-server").args(self.server_args())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NotionConfig {
        NotionConfig {
            token: Some("ntn_test".into()),
            headers: None,
            transport: "stdio".into(),
            port: DEFAULT_PORT,
            auth_token: None,
        }
    }

    #[test]
    fn credentials_accept_token_or_headers() {
        assert!(config().has_credentials());
        let headers_only = NotionConfig {
            token: None,
            headers: Some(r#"{"Authorization":"Bearer x"}"#.into()),
            ..config()
        };
        assert!(headers_only.has_credentials());
        let neither = NotionConfig {
            token: None,
            ..config()
        };
        assert!(!neither.has_credentials());
    }

    #[test]
    fn npm_spec_overlays_the_token() {
        let spec = config().launch_spec(Method::Npm);
        assert_eq!(spec.command, "npx");
        assert_eq!(
            spec.args,
            ["-y", "@notionhq/notion-mcp-server", "--transport", "stdio"]
        );
        assert_eq!(spec.env["NOTION_TOKEN"], "ntn_test");
        assert!(!spec.env.contains_key("AUTH_TOKEN"));
    }

    #[test]
    fn http_args_include_port_and_auth() {
        let cfg = NotionConfig {
            transport: "http".into(),
            port: 4000,
            auth_token: Some("secret".into()),
            ..config()
        };
        assert_eq!(
            cfg.server_args(),
            ["--transport", "http", "--port", "4000", "--auth-token", "secret"]
        );
        assert_eq!(cfg.env_overlay().into_map()["AUTH_TOKEN"], "secret");
    }

    #[test]
    fn default_port_is_left_implicit() {
        let cfg = NotionConfig {
            transport: "http".into(),
            ..config()
        };
        assert_eq!(cfg.server_args(), ["--transport", "http"]);
    }

    #[test]
    fn docker_official_passes_env_by_name() {
        let spec = config().launch_spec(Method::DockerOfficial);
        assert_eq!(spec.command, "docker");
        assert_eq!(
            spec.args,
            ["run", "--rm", "-i", "-e", "NOTION_TOKEN", "mcp/notion", "--transport", "stdio"]
        );
        assert_eq!(spec.env["NOTION_TOKEN"], "ntn_test");
    }

    #[test]
    fn docker_local_inlines_the_token() {
        let spec = config().launch_spec(Method::DockerLocal);
        assert_eq!(
            spec.args,
            [
                "run",
                "--rm",
                "-i",
                "-e",
                "NOTION_TOKEN=ntn_test",
                "notion-mcp-server",
                "--transport",
                "stdio"
            ]
        );
        assert!(spec.env.is_empty());
    }

    #[test]
    fn fallback_order_is_npm_then_docker() {
        let names: Vec<&str> = Method::CANDIDATES.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["npm", "docker-official", "docker-local"]);
    }
}
