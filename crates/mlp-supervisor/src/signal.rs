// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parent-process termination signal subscription.

/// Subscription to the parent's termination signals (interrupt and
/// terminate on unix, Ctrl-C elsewhere).
///
/// The subscription is scoped: handlers are registered on
/// [`TerminationSignals::subscribe`] and released when the value is dropped,
/// which happens on the supervisor's terminal transition.
#[derive(Debug)]
pub struct TerminationSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl TerminationSignals {
    /// Register handlers for the termination signals.
    pub fn subscribe() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Wait until any termination signal is received.
    pub async fn recv(mut self) {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => {}
                _ = self.terminate.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
