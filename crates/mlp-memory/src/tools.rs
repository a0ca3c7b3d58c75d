// SPDX-License-Identifier: MIT OR Apache-2.0
//! The memory bank's tool surface.

use async_trait::async_trait;
use mlp_protocol::{ToolError, ToolHandler, ToolOutput, ToolSpec};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::store::{Memory, MemoryBank, MemoryError, Query, SortField, SortOrder};

/// Tool server over a [`MemoryBank`].
pub struct MemoryTools {
    bank: MemoryBank,
}

impl MemoryTools {
    /// Wrap a bank.
    pub fn new(bank: MemoryBank) -> Self {
        Self { bank }
    }

    /// The underlying bank.
    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|err| ToolError::InvalidParams(err.to_string()))
}

// Persistence failures stop the server; everything else stays a per-call
// error result.
fn map_store_error(err: MemoryError) -> ToolError {
    match err {
        MemoryError::NotFound(_) | MemoryError::CapacityReached(_) => {
            ToolError::InvalidParams(err.to_string())
        }
        other => ToolError::Internal(other.to_string()),
    }
}

fn default_importance() -> u8 {
    5
}

fn default_retrieve_limit() -> usize {
    10
}

fn default_list_limit() -> usize {
    20
}

#[derive(Deserialize)]
struct StoreParams {
    content: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_importance")]
    importance: u8,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Deserialize)]
struct RetrieveParams {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    min_importance: Option<u8>,
    #[serde(default = "default_retrieve_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct UpdateParams {
    id: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    importance: Option<u8>,
}

#[derive(Deserialize)]
struct DeleteParams {
    id: String,
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    sort_by: SortField,
    #[serde(default)]
    order: SortOrder,
    #[serde(default = "default_list_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct ClearParams {
    #[serde(default)]
    confirm: bool,
}

fn describe(memory: &Memory) -> String {
    let mut text = format!(
        "ID: {}\nContent: {}\nTags: [{}]\nImportance: {}/10\nCreated: {}\n",
        memory.id,
        memory.content,
        memory.tags.join(", "),
        memory.importance,
        memory.created.to_rfc3339(),
    );
    if let Some(context) = &memory.context {
        text.push_str(&format!("Context: {context}\n"));
    }
    text.push_str("---");
    text
}

fn summarize(memory: &Memory) -> String {
    let content: String = memory.content.chars().take(100).collect();
    let ellipsis = if memory.content.chars().count() > 100 {
        "..."
    } else {
        ""
    };
    format!(
        "{} | {content}{ellipsis} | [{}] | Importance: {}",
        memory.id,
        memory.tags.join(", "),
        memory.importance,
    )
}

#[async_trait]
impl ToolHandler for MemoryTools {
    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec {
                name: "store_memory".into(),
                description: "Store a new memory with content, tags, and metadata".into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "content": {"type": "string", "description": "The memory content to store"},
                        "tags": {"type": "array", "items": {"type": "string"}, "default": []},
                        "importance": {"type": "number", "minimum": 1, "maximum": 10, "default": 5},
                        "context": {"type": "string", "description": "When/where this memory was created"}
                    },
                    "required": ["content"]
                }),
            },
            ToolSpec {
                name: "retrieve_memories".into(),
                description: "Retrieve memories based on search criteria".into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Matched against content and tags"},
                        "tags": {"type": "array", "items": {"type": "string"}},
                        "min_importance": {"type": "number", "minimum": 1, "maximum": 10},
                        "limit": {"type": "number", "default": 10}
                    }
                }),
            },
            ToolSpec {
                name: "update_memory".into(),
                description: "Update an existing memory".into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "content": {"type": "string"},
                        "tags": {"type": "array", "items": {"type": "string"}},
                        "importance": {"type": "number", "minimum": 1, "maximum": 10}
                    },
                    "required": ["id"]
                }),
            },
            ToolSpec {
                name: "delete_memory".into(),
                description: "Delete a specific memory".into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {"id": {"type": "string"}},
                    "required": ["id"]
                }),
            },
            ToolSpec {
                name: "list_memories".into(),
                description: "List all memories with basic information".into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "sort_by": {"type": "string", "enum": ["created", "modified", "importance"], "default": "created"},
                        "order": {"type": "string", "enum": ["asc", "desc"], "default": "desc"},
                        "limit": {"type": "number", "default": 20}
                    }
                }),
            },
            ToolSpec {
                name: "get_memory_stats".into(),
                description: "Get statistics about the memory bank".into(),
                input_schema: json!({"type": "object", "properties": {}}),
            },
            ToolSpec {
                name: "clear_memories".into(),
                description: "Clear all memories (use with caution)".into(),
                input_schema: json!({
                    "type": "object",
                    "properties": {"confirm": {"type": "boolean"}},
                    "required": ["confirm"]
                }),
            },
        ]
    }

    async fn call(&mut self, tool: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        match tool {
            "store_memory" => {
                let params: StoreParams = parse_args(arguments)?;
                if params.content.is_empty() {
                    return Err(ToolError::InvalidParams(
                        "content is required and must not be empty".into(),
                    ));
                }
                let memory = self
                    .bank
                    .store(params.content, params.tags, params.importance, params.context)
                    .map_err(map_store_error)?;
                let id = memory.id.clone();
                Ok(
                    ToolOutput::text(format!("Memory stored successfully with ID: {id}"))
                        .with_metadata(json!({
                            "memory_id": id,
                            "total_memories": self.bank.len(),
                        })),
                )
            }
            "retrieve_memories" => {
                let params: RetrieveParams = parse_args(arguments)?;
                let matches = self.bank.retrieve(&Query {
                    text: params.query,
                    tags: params.tags,
                    min_importance: params.min_importance,
                    limit: params.limit,
                });
                let text = if matches.is_empty() {
                    "No memories found matching the criteria.".to_string()
                } else {
                    let body: Vec<String> = matches.iter().map(|m| describe(m)).collect();
                    format!(
                        "Found {} matching memories:\n\n{}",
                        matches.len(),
                        body.join("\n\n")
                    )
                };
                let match_count = matches.len();
                Ok(ToolOutput::text(text).with_metadata(json!({
                    "match_count": match_count,
                    "total_memories": self.bank.len(),
                })))
            }
            "update_memory" => {
                let params: UpdateParams = parse_args(arguments)?;
                self.bank
                    .update(&params.id, params.content, params.tags, params.importance)
                    .map_err(map_store_error)?;
                Ok(ToolOutput::text(format!(
                    "Memory {} updated successfully",
                    params.id
                )))
            }
            "delete_memory" => {
                let params: DeleteParams = parse_args(arguments)?;
                self.bank.delete(&params.id).map_err(map_store_error)?;
                Ok(
                    ToolOutput::text(format!("Memory {} deleted successfully", params.id))
                        .with_metadata(json!({"total_memories": self.bank.len()})),
                )
            }
            "list_memories" => {
                let params: ListParams = parse_args(arguments)?;
                let memories = self.bank.list(params.sort_by, params.order, params.limit);
                let text = if memories.is_empty() {
                    "No memories in the bank.".to_string()
                } else {
                    let lines: Vec<String> = memories.iter().map(|m| summarize(m)).collect();
                    format!(
                        "Memory Bank Contents ({} of {} total):\n\n{}",
                        memories.len(),
                        self.bank.len(),
                        lines.join("\n")
                    )
                };
                Ok(ToolOutput::text(text))
            }
            "get_memory_stats" => {
                let stats = self.bank.stats();
                let metadata = serde_json::to_value(&stats)
                    .map_err(|err| ToolError::Internal(err.to_string()))?;
                let pretty = serde_json::to_string_pretty(&stats)
                    .map_err(|err| ToolError::Internal(err.to_string()))?;
                Ok(
                    ToolOutput::text(format!("Memory Bank Statistics:\n\n{pretty}"))
                        .with_metadata(metadata),
                )
            }
            "clear_memories" => {
                let params: ClearParams = parse_args(arguments)?;
                if !params.confirm {
                    return Err(ToolError::InvalidParams(
                        "Must confirm deletion by setting confirm=true".into(),
                    ));
                }
                let count = self.bank.clear().map_err(map_store_error)?;
                Ok(ToolOutput::text(format!(
                    "All {count} memories have been cleared from the memory bank"
                )))
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}
