// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-protocol
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod frame;
pub mod server;

pub use codec::JsonlCodec;
pub use error::{ProtocolError, ToolError};
pub use frame::{Frame, ToolOutput, ToolSpec};
pub use server::{ToolHandler, serve, serve_stdio};
