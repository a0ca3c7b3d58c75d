// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-shim-fetch
#![deny(unsafe_code)]
#![warn(missing_docs)]

use mlp_supervisor::LaunchSpec;

/// Display name used in lifecycle notices.
pub const SERVER_NAME: &str = "Fetch MCP Server";

/// Default request timeout in seconds; omitted from the child's arguments.
pub const DEFAULT_TIMEOUT: u32 = 30;

/// Installation method for the fetch server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum Method {
    /// `uvx mcp-server-fetch`.
    Uvx,
    /// `docker run -i --rm mcp/fetch`.
    Docker,
    /// `npx -y mcp-server-fetch`.
    Npx,
}

impl Method {
    /// Fallback order when the preferred method's tool is missing.
    pub const CANDIDATES: [Method; 3] = [Method::Uvx, Method::Docker, Method::Npx];

    /// The tool whose availability gates this method.
    pub fn tool(self) -> &'static str {
        match self {
            Method::Uvx => "uvx",
            Method::Docker => "docker",
            Method::Npx => "npx",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tool())
    }
}

/// Resolved configuration for the fetch shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Ignore robots.txt restrictions.
    pub ignore_robots_txt: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
    /// Proxy URL for requests.
    pub proxy_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout: u32,
}

impl FetchConfig {
    /// Server arguments shared by all methods. The default timeout is left
    /// implicit.
    pub fn server_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.ignore_robots_txt {
            args.push("--ignore-robots-txt".to_string());
        }
        if let Some(ua) = &self.user_agent {
            args.push("--user-agent".to_string());
            args.push(ua.clone());
        }
        if let Some(proxy) = &self.proxy_url {
            args.push("--proxy-url".to_string());
            args.push(proxy.clone());
        }
        if self.timeout != DEFAULT_TIMEOUT {
            args.push("--timeout".to_string());
            args.push(self.timeout.to_string());
        }
        args
    }

    /// The launch spec for the given method.
    pub fn launch_spec(&self, method: Method) -> LaunchSpec {
        match method {
            Method::Uvx => LaunchSpec::new(SERVER_NAME, "uvx")
                .arg("mcp-server-fetch")
                .args(self.server_args()),
            Method::Docker => {
                let mut spec = LaunchSpec::new(SERVER_NAME, "docker").args(["run", "-i", "--rm"]);
                if self.ignore_robots_txt {
                    spec = spec.args(["-e", "IGNORE_ROBOTS_TXT=true"]);
                }
                if let Some(ua) = &self.user_agent {
                    spec = spec.arg("-e").arg(format!("USER_AGENT={ua}"));
                }
                if let Some(proxy) = &self.proxy_url {
                    spec = spec.arg("-e").arg(format!("PROXY_URL={proxy}"));
                }
                spec.arg("mcp/fetch").args(self.server_args())
            }
            Method::Npx => LaunchSpec::new(SERVER_NAME, "npx")
                .args(["-y", "mcp-server-fetch"])
                .args(self.server_args()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FetchConfig {
        FetchConfig {
            ignore_robots_txt: false,
            user_agent: None,
            proxy_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[test]
    fn default_args_are_empty() {
        assert!(config().server_args().is_empty());
    }

    #[test]
    fn non_default_timeout_is_passed() {
        let cfg = FetchConfig {
            timeout: 60,
            ..config()
        };
        assert_eq!(cfg.server_args(), ["--timeout", "60"]);
    }

    #[test]
    fn uvx_spec() {
        let spec = config().launch_spec(Method::Uvx);
        assert_eq!(spec.command, "uvx");
        assert_eq!(spec.args, ["mcp-server-fetch"]);
    }

    #[test]
    fn npx_spec_forwards_flags() {
        let cfg = FetchConfig {
            ignore_robots_txt: true,
            user_agent: Some("mlp-test/1.0".into()),
            ..config()
        };
        let spec = cfg.launch_spec(Method::Npx);
        assert_eq!(spec.command, "npx");
        assert_eq!(
            spec.args,
            [
                "-y",
                "mcp-server-fetch",
                "--ignore-robots-txt",
                "--user-agent",
                "mlp-test/1.0"
            ]
        );
    }

    #[test]
    fn docker_spec_uses_env_flags() {
        let cfg = FetchConfig {
            ignore_robots_txt: true,
            proxy_url: Some("http://proxy:3128".into()),
            ..config()
        };
        let spec = cfg.launch_spec(Method::Docker);
        assert_eq!(spec.command, "docker");
        assert_eq!(
            spec.args,
            [
                "run",
                "-i",
                "--rm",
                "-e",
                "IGNORE_ROBOTS_TXT=true",
                "-e",
                "PROXY_URL=http://proxy:3128",
                "mcp/fetch",
                "--ignore-robots-txt",
                "--proxy-url",
                "http://proxy:3128"
            ]
        );
    }

    #[test]
    fn fallback_order_is_uvx_docker_npx() {
        let tools: Vec<&str> = Method::CANDIDATES.iter().map(|m| m.tool()).collect();
        assert_eq!(tools, ["uvx", "docker", "npx"]);
    }
}
