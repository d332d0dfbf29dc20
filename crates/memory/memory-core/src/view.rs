//! Read-side shapes returned to calling agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Memory, Metadata};

/// A memory as returned by retrieval: the record without its embedding, plus its scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryView {
    pub id: String,
    pub agent_id: String,
    pub content: String,
    pub memory_type: String,
    pub importance: f64,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u32,
    /// Cosine similarity to the query.
    pub similarity: f64,
    /// Composite relevance score used for ordering.
    pub score: f64,
}

impl MemoryView {
    pub fn from_memory(memory: Memory, similarity: f64, score: f64) -> Self {
        Self {
            id: memory.id,
            agent_id: memory.agent_id,
            content: memory.content,
            memory_type: memory.memory_type,
            importance: memory.importance,
            metadata: memory.metadata,
            created_at: memory.created_at,
            last_accessed_at: memory.last_accessed_at,
            access_count: memory.access_count,
            similarity,
            score,
        }
    }
}

/// Aggregate counts across all record kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemoryStats {
    pub total_memories: i64,
    pub total_conversations: i64,
    pub total_triples: i64,
    /// Memory count per agent_id.
    pub per_agent_counts: BTreeMap<String, i64>,
    /// Memory count per memory_type.
    pub memories_by_type: BTreeMap<String, i64>,
}
