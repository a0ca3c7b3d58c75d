// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! mlp-thinking
#![deny(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use mlp_protocol::{ToolError, ToolHandler, ToolOutput, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::info;

/// One step in a thinking chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtStep {
    /// The thinking content.
    pub thought: String,
    /// Whether another step is expected.
    pub next_thought_needed: bool,
    /// Position of this step, starting at 1.
    pub thought_number: u32,
    /// Current estimate of total steps. Adjustable up or down.
    pub total_thoughts: u32,
    /// Whether this step revises an earlier one.
    #[serde(default)]
    pub is_revision: bool,
    /// The step being revised, when `is_revision`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revises_thought: Option<u32>,
    /// The step this branch forks from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_from_thought: Option<u32>,
    /// Identifier of the branch this step belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Whether the estimate needs to grow.
    #[serde(default)]
    pub needs_more_thoughts: bool,
}

impl ThoughtStep {
    fn validate(&self) -> Result<(), ToolError> {
        if self.thought.trim().is_empty() {
            return Err(ToolError::InvalidParams(
                "thought must be a non-empty string".into(),
            ));
        }
        if self.thought_number < 1 {
            return Err(ToolError::InvalidParams(
                "thoughtNumber must be a positive integer".into(),
            ));
        }
        if self.total_thoughts < 1 {
            return Err(ToolError::InvalidParams(
                "totalThoughts must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

/// The sequential-thinking tool server.
#[derive(Debug, Default)]
pub struct ThinkingServer {
    log_thoughts: bool,
    history: Vec<ThoughtStep>,
    branches: BTreeMap<String, Vec<ThoughtStep>>,
}

impl ThinkingServer {
    /// New server; `log_thoughts` controls the stderr trace of each step.
    pub fn new(log_thoughts: bool) -> Self {
        Self {
            log_thoughts,
            ..Self::default()
        }
    }

    /// Steps accepted so far, in arrival order.
    pub fn history(&self) -> &[ThoughtStep] {
        &self.history
    }

    /// Branch ids seen so far.
    pub fn branch_ids(&self) -> Vec<&str> {
        self.branches.keys().map(String::as_str).collect()
    }

    fn log_step(&self, step: &ThoughtStep) {
        let mut header = format!("Thought {}/{}:", step.thought_number, step.total_thoughts);
        if step.is_revision {
            if let Some(revises) = step.revises_thought {
                header.push_str(&format!(" (Revising thought {revises})"));
            }
        }
        if let (Some(from), Some(id)) = (step.branch_from_thought, &step.branch_id) {
            header.push_str(&format!(" (Branch {id} from thought {from})"));
        }
        if step.needs_more_thoughts {
            header.push_str(" (Needs more thoughts)");
        }
        info!(target: "mlp.thinking", "{header}");
        info!(target: "mlp.thinking", "{}", step.thought);
        info!(target: "mlp.thinking", "---");
    }

    /// Validate, record, and answer one step.
    pub fn process(&mut self, step: ThoughtStep) -> Result<ToolOutput, ToolError> {
        step.validate()?;

        if self.log_thoughts {
            self.log_step(&step);
        }

        if let Some(id) = &step.branch_id {
            self.branches.entry(id.clone()).or_default().push(step.clone());
        }
        self.history.push(step.clone());

        let mut metadata = json!({
            "thoughtNumber": step.thought_number,
            "totalThoughts": step.total_thoughts,
            "nextThoughtNeeded": step.next_thought_needed,
            "isRevision": step.is_revision,
            "needsMoreThoughts": step.needs_more_thoughts,
            "thoughtHistoryLength": self.history.len(),
            "branches": self.branches.keys().collect::<Vec<_>>(),
        });
        if let Some(revises) = step.revises_thought {
            metadata["revisesThought"] = json!(revises);
        }
        if let Some(from) = step.branch_from_thought {
            metadata["branchFromThought"] = json!(from);
        }
        if let Some(id) = &step.branch_id {
            metadata["branchId"] = json!(id);
        }

        Ok(ToolOutput::text(format!(
            "Thought {}/{}: {}",
            step.thought_number, step.total_thoughts, step.thought
        ))
        .with_metadata(metadata))
    }
}

#[async_trait]
impl ToolHandler for ThinkingServer {
    fn tools(&self) -> Vec<ToolSpec> {
        vec![ToolSpec {
            name: "sequentialthinking".into(),
            description: "A detailed tool for dynamic and reflective problem-solving \
                          through thoughts. Each thought can build on, question, or \
                          revise previous insights as understanding deepens."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "thought": {"type": "string", "description": "Your current thinking step"},
                    "nextThoughtNeeded": {"type": "boolean", "description": "Whether another thought step is needed"},
                    "thoughtNumber": {"type": "integer", "minimum": 1, "description": "Current thought number"},
                    "totalThoughts": {"type": "integer", "minimum": 1, "description": "Estimated total thoughts needed"},
                    "isRevision": {"type": "boolean", "description": "Whether this revises previous thinking"},
                    "revisesThought": {"type": "integer", "minimum": 1, "description": "Which thought is being reconsidered"},
                    "branchFromThought": {"type": "integer", "minimum": 1, "description": "Branching point thought number"},
                    "branchId": {"type": "string", "description": "Branch identifier"},
                    "needsMoreThoughts": {"type": "boolean", "description": "If more thoughts are needed"}
                },
                "required": ["thought", "nextThoughtNeeded", "thoughtNumber", "totalThoughts"]
            }),
        }]
    }

    async fn call(&mut self, tool: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        if tool != "sequentialthinking" {
            return Err(ToolError::UnknownTool(tool.to_string()));
        }
        let step: ThoughtStep = serde_json::from_value(arguments)
            .map_err(|err| ToolError::InvalidParams(err.to_string()))?;
        self.process(step)
    }
}
