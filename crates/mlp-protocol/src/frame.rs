// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSONL frame definitions for the tool-server protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Description of one tool a server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    /// Tool name used in `call` frames.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema for the call arguments.
    pub input_schema: Value,
}

/// Successful output of a tool call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    /// Text payload returned to the client.
    pub content: String,
    /// Structured metadata alongside the text.
    pub metadata: Value,
}

impl ToolOutput {
    /// Output with text content and no metadata.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Value::Null,
        }
    }

    /// Attach metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A protocol frame. The discriminator tag is `"t"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Frame {
    /// Client asks for the tool list.
    ListTools {
        /// Request id, echoed in the response.
        id: String,
    },
    /// Server's answer to `list_tools`.
    Tools {
        /// Id of the request being answered.
        ref_id: String,
        /// The advertised tools.
        tools: Vec<ToolSpec>,
    },
    /// Client invokes a tool.
    Call {
        /// Request id, echoed in the response.
        id: String,
        /// Tool name.
        tool: String,
        /// Call arguments.
        #[serde(default)]
        arguments: Value,
    },
    /// Server's answer to `call`.
    Result {
        /// Id of the request being answered.
        ref_id: String,
        /// Text payload (or error description when `is_error`).
        content: String,
        /// Whether the call failed.
        is_error: bool,
        /// Structured metadata.
        #[serde(default, skip_serializing_if = "Value::is_null")]
        metadata: Value,
    },
    /// Unrecoverable server-side failure; the server exits afterwards.
    Fatal {
        /// Id of the request being processed, if any.
        ref_id: Option<String>,
        /// Error description.
        error: String,
    },
}
