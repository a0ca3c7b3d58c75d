// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transport and tool-call error types.

use thiserror::Error;

/// Errors from the JSONL transport itself.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading a request line failed.
    #[error("failed to read request: {0}")]
    Read(#[source] std::io::Error),

    /// Writing a response line failed.
    #[error("failed to write response: {0}")]
    Write(#[source] std::io::Error),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A request line was not a valid frame.
    #[error("malformed frame: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Errors a tool handler can return for a single call.
///
/// `InvalidParams` and `UnknownTool` become error results on the wire and
/// leave the server running; `Internal` is fatal to the serve loop.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The call's arguments were missing or malformed.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// No tool with the requested name exists.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The handler failed in a way that should stop the server.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_display() {
        assert_eq!(
            ToolError::UnknownTool("frobnicate".into()).to_string(),
            "unknown tool: frobnicate"
        );
        assert_eq!(
            ToolError::InvalidParams("content is required".into()).to_string(),
            "invalid params: content is required"
        );
    }
}
