// SPDX-License-Identifier: MIT OR Apache-2.0
//! The process supervisor: launch one child, relay signals, mirror its exit.

use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

use crate::error::LaunchError;
use crate::signal::TerminationSignals;
use crate::spec::LaunchSpec;

/// Terminal state of a supervised child.
///
/// The supervisor's state machine is `NotStarted -> Running ->
/// {Terminated(code) | Killed}`; this enum covers the terminal states.
/// No transition returns to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The child exited cleanly (code 0) or was killed by an external
    /// signal, which yields no exit code.
    Clean,
    /// The child exited on its own with a non-zero code.
    Abnormal(i32),
    /// The parent received a termination signal and relayed it; the child
    /// was asked to terminate but not waited for.
    SignalRelayed,
}

impl ExitOutcome {
    /// Exit code the parent should terminate with to honor the contract:
    /// 0 on clean exit or graceful signal shutdown, the child's own code on
    /// abnormal exit.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Clean | Self::SignalRelayed => 0,
            Self::Abnormal(code) => *code,
        }
    }
}

/// Convert a contract exit code into [`std::process::ExitCode`]. Codes
/// outside the 0..=255 range collapse to 1.
pub fn process_exit(code: i32) -> std::process::ExitCode {
    u8::try_from(code).map_or(std::process::ExitCode::from(1), std::process::ExitCode::from)
}

/// One-shot supervisor for a single child process.
#[derive(Debug)]
pub struct Supervisor {
    spec: LaunchSpec,
}

impl Supervisor {
    /// Create a supervisor for the given launch specification.
    pub fn new(spec: LaunchSpec) -> Self {
        Self { spec }
    }

    /// Start the child with stdin/stdout/stderr inherited from the parent.
    ///
    /// Emits a "starting" notice on the diagnostic stream. On failure the
    /// returned [`LaunchError::Spawn`] carries the OS error; no retry is
    /// attempted.
    pub fn launch(self) -> Result<RunningChild, LaunchError> {
        let LaunchSpec {
            display_name,
            command,
            args,
            env,
            cwd,
        } = self.spec;

        info!(target: "mlp.supervisor", "starting {display_name}...");

        let mut cmd = Command::new(&command);
        cmd.args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        for (key, value) in &env {
            cmd.env(key, value);
        }
        if let Some(dir) = &cwd {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|source| {
            error!(target: "mlp.supervisor", "error starting {display_name}: {source}");
            LaunchError::Spawn {
                name: display_name.clone(),
                source,
            }
        })?;

        Ok(RunningChild {
            child,
            display_name,
        })
    }

    /// Launch and supervise in one step, using the parent's real
    /// termination signals as the shutdown trigger.
    pub async fn run(self) -> Result<ExitOutcome, LaunchError> {
        self.launch()?.supervise().await
    }
}

/// A live child process owned by the supervisor.
///
/// At most one exists per supervisor instance; it is consumed by the
/// supervise methods on the terminal transition.
#[derive(Debug)]
pub struct RunningChild {
    child: Child,
    display_name: String,
}

impl RunningChild {
    /// OS process id of the child, if it is still running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Supervise until the child exits or the parent receives a
    /// termination signal.
    pub async fn supervise(self) -> Result<ExitOutcome, LaunchError> {
        let signals = TerminationSignals::subscribe().map_err(LaunchError::SignalSubscribe)?;
        self.supervise_until(signals.recv()).await
    }

    /// Supervise with an injectable shutdown trigger.
    ///
    /// Reacts to whichever fires first: the child's exit or `shutdown`.
    /// On shutdown the child is sent a terminate request (SIGTERM, not a
    /// forced kill) and [`ExitOutcome::SignalRelayed`] is returned
    /// immediately — best effort, without waiting for the child to finish.
    pub async fn supervise_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<ExitOutcome, LaunchError> {
        tokio::pin!(shutdown);

        tokio::select! {
            status = self.child.wait() => {
                let status = status.map_err(|source| LaunchError::Wait {
                    name: self.display_name.clone(),
                    source,
                })?;
                match status.code() {
                    // None: killed by an external signal. Treated as clean.
                    Some(0) | None => Ok(ExitOutcome::Clean),
                    Some(code) => {
                        error!(
                            target: "mlp.supervisor",
                            "{} exited with code {code}", self.display_name
                        );
                        Ok(ExitOutcome::Abnormal(code))
                    }
                }
            }
            () = &mut shutdown => {
                warn!(target: "mlp.supervisor", "shutting down {}...", self.display_name);
                self.request_terminate();
                Ok(ExitOutcome::SignalRelayed)
            }
        }
    }

    #[cfg(unix)]
    fn request_terminate(&mut self) {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        if let Some(pid) = self.child.id() {
            // Best effort: the child may already be gone.
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
    }

    #[cfg(not(unix))]
    fn request_terminate(&mut self) {
        let _ = self.child.start_kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_contract() {
        assert_eq!(ExitOutcome::Clean.exit_code(), 0);
        assert_eq!(ExitOutcome::SignalRelayed.exit_code(), 0);
        assert_eq!(ExitOutcome::Abnormal(7).exit_code(), 7);
        assert_eq!(ExitOutcome::Abnormal(143).exit_code(), 143);
    }

    #[test]
    fn out_of_range_codes_collapse_to_one() {
        // ExitCode lacks PartialEq; compare debug renderings.
        let render = |code: i32| format!("{:?}", process_exit(code));
        assert_eq!(render(0), format!("{:?}", std::process::ExitCode::from(0)));
        assert_eq!(render(7), format!("{:?}", std::process::ExitCode::from(7)));
        assert_eq!(render(-1), format!("{:?}", std::process::ExitCode::from(1)));
        assert_eq!(render(512), format!("{:?}", std::process::ExitCode::from(1)));
    }
}
