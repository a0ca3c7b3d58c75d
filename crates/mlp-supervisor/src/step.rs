// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pre-launch steps run to completion before the supervised child starts
//! (e.g. `docker pull`, `git clone`).

use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::info;

use crate::error::LaunchError;
use crate::spec::LaunchSpec;

/// Run a preparatory command to completion.
///
/// Stdout and stderr are captured and forwarded line-by-line to the
/// diagnostic stream; stdin is closed. Returns the step's exit status so
/// callers can decide whether a failure is fatal or merely advisory.
pub async fn run_step(spec: LaunchSpec) -> Result<ExitStatus, LaunchError> {
    let LaunchSpec {
        display_name,
        command,
        args,
        env,
        cwd,
    } = spec;

    let mut cmd = Command::new(&command);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    for (key, value) in &env {
        cmd.env(key, value);
    }
    if let Some(dir) = &cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        name: display_name.clone(),
        source,
    })?;

    if let Some(stdout) = child.stdout.take() {
        forward_lines(stdout, display_name.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        forward_lines(stderr, display_name.clone());
    }

    child.wait().await.map_err(|source| LaunchError::Wait {
        name: display_name,
        source,
    })
}

fn forward_lines<R>(reader: R, name: String)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim_end();
            if !line.is_empty() {
                info!(target: "mlp.supervisor", "[{name}] {line}");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn step_success_status() {
        let status = run_step(LaunchSpec::new("step", "sh").args(["-c", "echo ready"]))
            .await
            .unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn step_failure_status() {
        let status = run_step(LaunchSpec::new("step", "sh").args(["-c", "exit 3"]))
            .await
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn step_missing_binary_is_spawn_error() {
        let err = run_step(LaunchSpec::new("Broken Step", "no-such-binary-mlp"))
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
        assert!(err.to_string().contains("Broken Step"));
    }
}
