// SPDX-License-Identifier: MIT OR Apache-2.0
//! File-backed memory storage.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Document format version written to disk.
const DOC_VERSION: &str = "1.0.0";

/// Errors from the memory store.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Reading the memory file failed.
    #[error("failed to read memory file {path}: {source}")]
    Load {
        /// The memory file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The memory file held invalid JSON.
    #[error("memory file {path} is not valid JSON: {source}")]
    Parse {
        /// The memory file path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the memory file failed.
    #[error("failed to write memory file {path}: {source}")]
    Save {
        /// The memory file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bank is full.
    #[error("maximum number of memories ({0}) reached")]
    CapacityReached(usize),

    /// No memory with the given id.
    #[error("memory with ID {0} not found")]
    NotFound(String),
}

/// One stored memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    /// Unique id, assigned at store time.
    pub id: String,
    /// The memory text.
    pub content: String,
    /// Categorization tags.
    pub tags: Vec<String>,
    /// Importance from 1 to 10.
    pub importance: u8,
    /// Where or when the memory was made, if recorded.
    pub context: Option<String>,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Sort field for [`MemoryBank::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// By creation time.
    #[default]
    Created,
    /// By last modification time.
    Modified,
    /// By importance.
    Importance,
}

/// Sort direction for [`MemoryBank::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Search criteria for [`MemoryBank::retrieve`].
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Case-insensitive substring matched against content, tags, and context.
    pub text: Option<String>,
    /// Keep memories carrying at least one of these tags.
    pub tags: Vec<String>,
    /// Keep memories at or above this importance.
    pub min_importance: Option<u8>,
    /// Maximum number of results.
    pub limit: usize,
}

/// Aggregate statistics over the bank.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stats {
    /// Number of stored memories.
    pub total_memories: usize,
    /// Configured capacity.
    pub max_memories: usize,
    /// Mean importance, rounded to two decimals. Zero when empty.
    pub average_importance: f64,
    /// Distinct tags in use, sorted.
    pub tags: Vec<String>,
    /// Creation time of the oldest memory.
    pub oldest_memory: Option<DateTime<Utc>>,
    /// Creation time of the newest memory.
    pub newest_memory: Option<DateTime<Utc>>,
}

/// On-disk document wrapping the memory map.
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: String,
    timestamp: DateTime<Utc>,
    count: usize,
    #[serde(default)]
    memories: BTreeMap<String, Memory>,
}

/// The memory bank: an in-memory map persisted to a JSON file after every
/// mutation.
#[derive(Debug)]
pub struct MemoryBank {
    path: PathBuf,
    max_memories: usize,
    memories: BTreeMap<String, Memory>,
}

impl MemoryBank {
    /// Open a bank backed by `path`. A missing file starts an empty bank;
    /// an unreadable or malformed file is an error.
    pub fn open(path: impl Into<PathBuf>, max_memories: usize) -> Result<Self, MemoryError> {
        let path = path.into();
        let memories = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|source| MemoryError::Load {
                path: path.clone(),
                source,
            })?;
            let doc: Document =
                serde_json::from_str(&raw).map_err(|source| MemoryError::Parse {
                    path: path.clone(),
                    source,
                })?;
            info!(target: "mlp.memory", "loaded {} memories from {}", doc.memories.len(), path.display());
            doc.memories
        } else {
            info!(target: "mlp.memory", "memory file {} does not exist, starting fresh", path.display());
            BTreeMap::new()
        };
        Ok(Self {
            path,
            max_memories,
            memories,
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored memories.
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    /// Whether the bank is empty.
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Look up a memory by id.
    pub fn get(&self, id: &str) -> Option<&Memory> {
        self.memories.get(id)
    }

    /// Store a new memory and persist. Importance is clamped to 1..=10.
    pub fn store(
        &mut self,
        content: String,
        tags: Vec<String>,
        importance: u8,
        context: Option<String>,
    ) -> Result<&Memory, MemoryError> {
        if self.memories.len() >= self.max_memories {
            return Err(MemoryError::CapacityReached(self.max_memories));
        }
        let id = format!("mem_{}", Uuid::new_v4().as_simple());
        let now = Utc::now();
        let memory = Memory {
            id: id.clone(),
            content,
            tags,
            importance: importance.clamp(1, 10),
            context,
            created: now,
            modified: now,
        };
        self.memories.insert(id.clone(), memory);
        self.save()?;
        // Inserted just above, so the entry is present.
        Ok(&self.memories[&id])
    }

    /// Search the bank. Results sort by importance (desc) then creation time
    /// (newest first).
    pub fn retrieve(&self, query: &Query) -> Vec<&Memory> {
        let mut matches: Vec<&Memory> = self
            .memories
            .values()
            .filter(|memory| {
                query
                    .min_importance
                    .is_none_or(|min| memory.importance >= min)
            })
            .filter(|memory| {
                query.tags.is_empty() || query.tags.iter().any(|tag| memory.tags.contains(tag))
            })
            .filter(|memory| match &query.text {
                None => true,
                Some(text) => {
                    let needle = text.to_lowercase();
                    memory.content.to_lowercase().contains(&needle)
                        || memory
                            .tags
                            .iter()
                            .any(|tag| tag.to_lowercase().contains(&needle))
                        || memory
                            .context
                            .as_ref()
                            .is_some_and(|ctx| ctx.to_lowercase().contains(&needle))
                }
            })
            .collect();
        matches.sort_by(|a, b| {
            b.importance
                .cmp(&a.importance)
                .then(b.created.cmp(&a.created))
        });
        matches.truncate(query.limit);
        matches
    }

    /// Update fields of an existing memory and persist. `None` fields are
    /// left unchanged.
    pub fn update(
        &mut self,
        id: &str,
        content: Option<String>,
        tags: Option<Vec<String>>,
        importance: Option<u8>,
    ) -> Result<(), MemoryError> {
        let memory = self
            .memories
            .get_mut(id)
            .ok_or_else(|| MemoryError::NotFound(id.to_string()))?;
        if let Some(content) = content {
            memory.content = content;
        }
        if let Some(tags) = tags {
            memory.tags = tags;
        }
        if let Some(importance) = importance {
            memory.importance = importance.clamp(1, 10);
        }
        memory.modified = Utc::now();
        self.save()
    }

    /// Delete a memory by id and persist.
    pub fn delete(&mut self, id: &str) -> Result<(), MemoryError> {
        if self.memories.remove(id).is_none() {
            return Err(MemoryError::NotFound(id.to_string()));
        }
        self.save()
    }

    /// List memories in the requested order, up to `limit`.
    pub fn list(&self, sort_by: SortField, order: SortOrder, limit: usize) -> Vec<&Memory> {
        let mut memories: Vec<&Memory> = self.memories.values().collect();
        memories.sort_by(|a, b| {
            let ordering = match sort_by {
                SortField::Created => a.created.cmp(&b.created),
                SortField::Modified => a.modified.cmp(&b.modified),
                SortField::Importance => a.importance.cmp(&b.importance),
            };
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        memories.truncate(limit);
        memories
    }

    /// Aggregate statistics.
    pub fn stats(&self) -> Stats {
        let mut tags = BTreeSet::new();
        let mut total_importance = 0u64;
        for memory in self.memories.values() {
            tags.extend(memory.tags.iter().cloned());
            total_importance += u64::from(memory.importance);
        }
        let average_importance = if self.memories.is_empty() {
            0.0
        } else {
            let mean = total_importance as f64 / self.memories.len() as f64;
            (mean * 100.0).round() / 100.0
        };
        Stats {
            total_memories: self.memories.len(),
            max_memories: self.max_memories,
            average_importance,
            tags: tags.into_iter().collect(),
            oldest_memory: self.memories.values().map(|m| m.created).min(),
            newest_memory: self.memories.values().map(|m| m.created).max(),
        }
    }

    /// Remove every memory and persist. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize, MemoryError> {
        let count = self.memories.len();
        self.memories.clear();
        self.save()?;
        Ok(count)
    }

    fn save(&self) -> Result<(), MemoryError> {
        let doc = Document {
            version: DOC_VERSION.to_string(),
            timestamp: Utc::now(),
            count: self.memories.len(),
            memories: self.memories.clone(),
        };
        let json = serde_json::to_string_pretty(&doc).map_err(|source| MemoryError::Save {
            path: self.path.clone(),
            source: std::io::Error::other(source),
        })?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| MemoryError::Save {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        std::fs::write(&self.path, json).map_err(|source| MemoryError::Save {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn bank_in(dir: &tempfile::TempDir, max: usize) -> MemoryBank {
        MemoryBank::open(dir.path().join("memory-bank.json"), max).unwrap()
    }

    #[test]
    fn store_assigns_id_and_clamps_importance() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 10);
        let id = bank
            .store("remember this".into(), vec![], 99, None)
            .unwrap()
            .id
            .clone();
        assert!(id.starts_with("mem_"));
        assert_eq!(bank.get(&id).unwrap().importance, 10);
        let low = bank.store("low".into(), vec![], 0, None).unwrap();
        assert_eq!(low.importance, 1);
    }

    #[test]
    fn capacity_is_enforced() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 2);
        bank.store("a".into(), vec![], 5, None).unwrap();
        bank.store("b".into(), vec![], 5, None).unwrap();
        let err = bank.store("c".into(), vec![], 5, None).unwrap_err();
        assert!(matches!(err, MemoryError::CapacityReached(2)));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory-bank.json");
        let id = {
            let mut bank = MemoryBank::open(&path, 10).unwrap();
            bank.store("durable".into(), vec!["keep".into()], 7, Some("test".into()))
                .unwrap()
                .id
                .clone()
        };
        let bank = MemoryBank::open(&path, 10).unwrap();
        let memory = bank.get(&id).unwrap();
        assert_eq!(memory.content, "durable");
        assert_eq!(memory.tags, vec!["keep".to_string()]);
        assert_eq!(memory.importance, 7);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory-bank.json");
        std::fs::write(&path, "not json").unwrap();
        let err = MemoryBank::open(&path, 10).unwrap_err();
        assert!(matches!(err, MemoryError::Parse { .. }));
    }

    #[test]
    fn retrieve_filters_and_sorts() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 10);
        bank.store("rust is fast".into(), vec!["lang".into()], 3, None)
            .unwrap();
        bank.store("Rust has ownership".into(), vec!["lang".into()], 9, None)
            .unwrap();
        bank.store("coffee break".into(), vec!["life".into()], 5, None)
            .unwrap();

        let matches = bank.retrieve(&Query {
            text: Some("rust".into()),
            limit: 10,
            ..Query::default()
        });
        assert_eq!(matches.len(), 2);
        // Higher importance first.
        assert_eq!(matches[0].content, "Rust has ownership");

        let matches = bank.retrieve(&Query {
            tags: vec!["life".into()],
            limit: 10,
            ..Query::default()
        });
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].content, "coffee break");

        let matches = bank.retrieve(&Query {
            min_importance: Some(5),
            limit: 10,
            ..Query::default()
        });
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn retrieve_matches_context() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 10);
        bank.store("a".into(), vec![], 5, Some("standup meeting".into()))
            .unwrap();
        let matches = bank.retrieve(&Query {
            text: Some("STANDUP".into()),
            limit: 10,
            ..Query::default()
        });
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn update_touches_modified_and_leaves_unset_fields() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 10);
        let id = bank
            .store("v1".into(), vec!["a".into()], 4, None)
            .unwrap()
            .id
            .clone();
        bank.update(&id, Some("v2".into()), None, Some(12)).unwrap();
        let memory = bank.get(&id).unwrap();
        assert_eq!(memory.content, "v2");
        assert_eq!(memory.tags, vec!["a".to_string()]);
        assert_eq!(memory.importance, 10);
        assert!(memory.modified >= memory.created);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 10);
        let err = bank.update("mem_missing", None, None, None).unwrap_err();
        assert!(matches!(err, MemoryError::NotFound(_)));
    }

    #[test]
    fn delete_removes_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory-bank.json");
        let mut bank = MemoryBank::open(&path, 10).unwrap();
        let id = bank
            .store("gone soon".into(), vec![], 5, None)
            .unwrap()
            .id
            .clone();
        bank.delete(&id).unwrap();
        assert!(bank.is_empty());
        let reopened = MemoryBank::open(&path, 10).unwrap();
        assert!(reopened.is_empty());
        assert!(matches!(
            bank.delete(&id).unwrap_err(),
            MemoryError::NotFound(_)
        ));
    }

    #[test]
    fn list_orders_by_importance() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 10);
        bank.store("low".into(), vec![], 2, None).unwrap();
        bank.store("high".into(), vec![], 8, None).unwrap();
        let listed = bank.list(SortField::Importance, SortOrder::Desc, 10);
        assert_eq!(listed[0].content, "high");
        let listed = bank.list(SortField::Importance, SortOrder::Asc, 1);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "low");
    }

    #[test]
    fn stats_summarize_the_bank() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 100);
        let stats = bank.stats();
        assert_eq!(stats.total_memories, 0);
        assert_eq!(stats.average_importance, 0.0);
        assert!(stats.oldest_memory.is_none());

        bank.store("a".into(), vec!["x".into(), "y".into()], 4, None)
            .unwrap();
        bank.store("b".into(), vec!["y".into()], 7, None).unwrap();
        let stats = bank.stats();
        assert_eq!(stats.total_memories, 2);
        assert_eq!(stats.max_memories, 100);
        assert_eq!(stats.average_importance, 5.5);
        assert_eq!(stats.tags, vec!["x".to_string(), "y".to_string()]);
        assert!(stats.oldest_memory.is_some());
    }

    #[test]
    fn clear_empties_the_bank() {
        let dir = tempdir().unwrap();
        let mut bank = bank_in(&dir, 10);
        bank.store("a".into(), vec![], 5, None).unwrap();
        bank.store("b".into(), vec![], 5, None).unwrap();
        assert_eq!(bank.clear().unwrap(), 2);
        assert!(bank.is_empty());
    }
}
