//! # Conversation Ledger
//!
//! Appends message/response pairs and mirrors each one into a `conversation` memory so it
//! can be retrieved later. The conversation row and its mirrored memory commit in one
//! transaction: either both exist or neither does.

use memory_core::{
    Conversation, ContextMap, Memory, Metadata, MetadataValue, Result, CONVERSATION_IMPORTANCE,
    CONVERSATION_MEMORY_TYPE,
};
use storage::{ConversationRepository, MemoryRepository, RelationalStore};
use tracing::{info, instrument, warn};

use crate::embedder::Embedder;
use crate::validate;

/// Ids written by one [`ConversationLedger::record`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub conversation_id: String,
    pub memory_id: String,
}

#[derive(Clone)]
pub struct ConversationLedger {
    store: RelationalStore,
    embedder: Embedder,
}

impl ConversationLedger {
    pub fn new(store: RelationalStore, embedder: Embedder) -> Self {
        Self { store, embedder }
    }

    #[instrument(skip(self, message, response, context))]
    pub async fn record(
        &self,
        session_id: &str,
        agent_id: &str,
        message: &str,
        response: &str,
        context: ContextMap,
    ) -> Result<LedgerEntry> {
        validate::non_empty("session_id", session_id)?;
        validate::non_empty("agent_id", agent_id)?;

        let conversation = Conversation::new(session_id, agent_id, message, response, context);
        let content = conversation.render();
        let embedding = self.embedder.embed(&content).await?;

        let mut metadata = Metadata::new();
        metadata.insert("session_id".to_string(), MetadataValue::from(session_id));
        metadata.insert(
            "conversation_id".to_string(),
            MetadataValue::from(conversation.id.as_str()),
        );
        let memory = Memory::new(
            agent_id,
            content,
            CONVERSATION_MEMORY_TYPE,
            CONVERSATION_IMPORTANCE,
            embedding,
            metadata,
        );

        let mut tx = self.store.begin().await?;
        let written = async {
            ConversationRepository::insert_with(&mut *tx, &conversation).await?;
            MemoryRepository::insert_with(&mut *tx, &memory).await
        }
        .await;

        if let Err(e) = written {
            warn!("Conversation write failed, rolling back: {}", e);
            tx.rollback().await.map_err(storage::StorageError::from)?;
            return Err(e.into());
        }
        tx.commit().await.map_err(storage::StorageError::from)?;

        info!(
            conversation_id = %conversation.id,
            memory_id = %memory.id,
            "Stored conversation"
        );
        Ok(LedgerEntry {
            conversation_id: conversation.id,
            memory_id: memory.id,
        })
    }

    /// Most recent conversations of a session, newest first.
    pub async fn history(&self, session_id: &str, limit: usize) -> Result<Vec<Conversation>> {
        validate::non_empty("session_id", session_id)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(self.store.conversations().list_by_session(session_id, limit).await?)
    }
}
