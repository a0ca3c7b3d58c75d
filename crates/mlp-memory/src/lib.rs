// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-memory
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod store;
pub mod tools;

pub use store::{Memory, MemoryBank, MemoryError, Query, SortField, SortOrder, Stats};
pub use tools::MemoryTools;
