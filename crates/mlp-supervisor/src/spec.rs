// SPDX-License-Identifier: MIT OR Apache-2.0
//! Launch specification types.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything needed to start one child process: command, arguments,
/// environment overlay, working directory, and a display name used in
/// diagnostics.
///
/// The child inherits the parent's environment; `env` entries are applied
/// on top of it. Built once per invocation and treated as immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Human-readable label, used only in diagnostic output.
    pub display_name: String,
    /// Executable name or path.
    pub command: String,
    /// Arguments passed to the command.
    pub args: Vec<String>,
    /// Environment variables overlaid on the inherited environment.
    pub env: BTreeMap<String, String>,
    /// Optional working directory override.
    pub cwd: Option<PathBuf>,
}

impl LaunchSpec {
    /// Create a spec with the given display name and command and no
    /// arguments or environment overrides.
    pub fn new(display_name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set one environment override.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Merge a whole map of environment overrides.
    #[must_use]
    pub fn envs(mut self, vars: BTreeMap<String, String>) -> Self {
        self.env.extend(vars);
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}
