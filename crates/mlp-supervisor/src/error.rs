// SPDX-License-Identifier: MIT OR Apache-2.0
//! Supervisor error types.

use thiserror::Error;

/// Errors from launching or supervising the child process.
///
/// Every variant is fatal to the parent: the supervisor makes no retry
/// attempts and callers are expected to exit with [`LaunchError::exit_code`].
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The target executable could not be started (missing binary,
    /// permission denied).
    #[error("failed to start {name}: {source}")]
    Spawn {
        /// Display name of the server being launched.
        name: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child's exit status failed.
    #[error("failed to wait on {name}: {source}")]
    Wait {
        /// Display name of the server being supervised.
        name: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Registering the parent's termination-signal handlers failed.
    #[error("failed to subscribe to termination signals: {0}")]
    SignalSubscribe(#[source] std::io::Error),
}

impl LaunchError {
    /// Exit code the parent should terminate with. Always 1: any launch or
    /// supervision failure is a LaunchFailure in the exit-code contract.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
