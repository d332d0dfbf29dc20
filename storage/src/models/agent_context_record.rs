//! Agent context snapshot model for persistence.
//!
//! Maps to the `agent_contexts` table (one row per agent).

use memory_core::AgentContext;

use crate::codec::{decode_json, decode_timestamp};
use crate::error::StorageError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AgentContextRecord {
    pub agent_id: String,
    pub current_context: String,
    pub active_memory_ids: String,
    pub last_updated: String,
}

impl TryFrom<AgentContextRecord> for AgentContext {
    type Error = StorageError;

    fn try_from(record: AgentContextRecord) -> Result<Self, Self::Error> {
        Ok(AgentContext {
            current_context: decode_json(&record.current_context)?,
            active_memory_ids: decode_json(&record.active_memory_ids)?,
            last_updated: Some(decode_timestamp(&record.last_updated)?),
            agent_id: record.agent_id,
        })
    }
}
