// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-supervisor
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! The supervisor is a one-shot value: construct it from a [`LaunchSpec`],
//! call [`Supervisor::launch`] (or the [`Supervisor::run`] convenience that
//! also supervises), and react to the returned [`ExitOutcome`]. Signal
//! subscriptions live inside [`RunningChild::supervise`] and are dropped on
//! the terminal transition; there is no process-global state.

pub mod error;
pub mod probe;
pub mod signal;
pub mod spec;
pub mod step;
pub mod supervisor;

pub use error::LaunchError;
pub use probe::{first_available, probe, probe_with_args};
pub use spec::LaunchSpec;
pub use step::run_step;
pub use supervisor::{ExitOutcome, RunningChild, Supervisor, process_exit};
