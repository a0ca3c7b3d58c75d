// SPDX-License-Identifier: MIT OR Apache-2.0
//! Availability probes for launcher tooling (npx, docker, uvx, go).
//!
//! A failed probe never aborts a launch by itself; it only steers the shim
//! to the next candidate command. Exhausting every candidate is what turns
//! into a launch failure.

use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Returns `true` if `<command> --version` runs and exits 0.
pub async fn probe(command: &str) -> bool {
    probe_with_args(command, &["--version"]).await
}

/// Returns `true` if `<command> <args...>` runs and exits 0. All three
/// standard streams are discarded.
pub async fn probe_with_args(command: &str, args: &[&str]) -> bool {
    let ok = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false);

    debug!(target: "mlp.supervisor", "probe {command}: {}", if ok { "ok" } else { "unavailable" });
    ok
}

/// Probe an ordered candidate list and return the first command that is
/// available, or `None` if every probe fails.
pub async fn first_available<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    for candidate in candidates {
        if probe(candidate).await {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn probe_missing_binary_is_false() {
        assert!(!probe("definitely-not-a-real-binary-mlp").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn probe_with_args_true_command() {
        // `true` ignores its arguments and exits 0.
        assert!(probe_with_args("true", &["--version"]).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn probe_with_args_failing_command() {
        assert!(!probe_with_args("false", &[]).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn first_available_skips_missing() {
        let found = first_available(["definitely-not-a-real-binary-mlp", "true"]).await;
        assert_eq!(found, Some("true"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn first_available_none_when_exhausted() {
        let found = first_available(["no-such-tool-a", "no-such-tool-b"]).await;
        assert_eq!(found, None);
    }
}
