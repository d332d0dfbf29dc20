//! Conversation record model for persistence.
//!
//! Maps to the `conversations` table.

use memory_core::Conversation;

use crate::codec::{decode_json, decode_timestamp, encode_json, encode_timestamp};
use crate::error::StorageError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationRecord {
    pub id: String,
    pub session_id: String,
    pub agent_id: String,
    pub message: String,
    pub response: String,
    pub context: String,
    pub timestamp: String,
}

impl TryFrom<&Conversation> for ConversationRecord {
    type Error = StorageError;

    fn try_from(conv: &Conversation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: conv.id.clone(),
            session_id: conv.session_id.clone(),
            agent_id: conv.agent_id.clone(),
            message: conv.message.clone(),
            response: conv.response.clone(),
            context: encode_json(&conv.context)?,
            timestamp: encode_timestamp(&conv.timestamp),
        })
    }
}

impl TryFrom<ConversationRecord> for Conversation {
    type Error = StorageError;

    fn try_from(record: ConversationRecord) -> Result<Self, Self::Error> {
        Ok(Conversation {
            context: decode_json(&record.context)?,
            timestamp: decode_timestamp(&record.timestamp)?,
            id: record.id,
            session_id: record.session_id,
            agent_id: record.agent_id,
            message: record.message,
            response: record.response,
        })
    }
}
