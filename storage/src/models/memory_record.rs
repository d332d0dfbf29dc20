//! Memory record model for persistence.
//!
//! Maps to the `memories` table.

use memory_core::Memory;

use crate::codec::{
    decode_embedding, decode_json, decode_timestamp, encode_embedding, encode_json,
    encode_timestamp,
};
use crate::error::StorageError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemoryRecord {
    pub id: String,
    pub agent_id: String,
    pub content: String,
    pub memory_type: String,
    pub importance: f64,
    pub embedding: Vec<u8>,
    pub metadata: String,
    pub created_at: String,
    pub last_accessed_at: String,
    pub access_count: i64,
}

impl TryFrom<&Memory> for MemoryRecord {
    type Error = StorageError;

    fn try_from(memory: &Memory) -> Result<Self, Self::Error> {
        Ok(Self {
            id: memory.id.clone(),
            agent_id: memory.agent_id.clone(),
            content: memory.content.clone(),
            memory_type: memory.memory_type.clone(),
            importance: memory.importance,
            embedding: encode_embedding(&memory.embedding),
            metadata: encode_json(&memory.metadata)?,
            created_at: encode_timestamp(&memory.created_at),
            last_accessed_at: encode_timestamp(&memory.last_accessed_at),
            access_count: i64::from(memory.access_count),
        })
    }
}

impl TryFrom<MemoryRecord> for Memory {
    type Error = StorageError;

    fn try_from(record: MemoryRecord) -> Result<Self, Self::Error> {
        let access_count = u32::try_from(record.access_count).map_err(|_| {
            StorageError::Decode(format!(
                "memory {} has invalid access_count {}",
                record.id, record.access_count
            ))
        })?;

        Ok(Memory {
            embedding: decode_embedding(&record.embedding)?,
            metadata: decode_json(&record.metadata)?,
            created_at: decode_timestamp(&record.created_at)?,
            last_accessed_at: decode_timestamp(&record.last_accessed_at)?,
            access_count,
            id: record.id,
            agent_id: record.agent_id,
            content: record.content,
            memory_type: record.memory_type,
            importance: record.importance,
        })
    }
}

/// Subset of columns the retention sweep filters on.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SweepCandidate {
    pub id: String,
    pub created_at: String,
}

impl SweepCandidate {
    pub fn created_at(&self) -> Result<chrono::DateTime<chrono::Utc>, StorageError> {
        decode_timestamp(&self.created_at)
    }
}
