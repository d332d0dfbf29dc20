//! RelationalStore: the four repositories over one pool.
//!
//! The single source of truth on disk. Components of the `memory` crate receive a clone of
//! this handle explicitly; there is no process-wide instance.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::agent_context_repo::AgentContextRepository;
use crate::conversation_repo::ConversationRepository;
use crate::error::StorageError;
use crate::memory_repo::MemoryRepository;
use crate::schema;
use crate::sqlite_pool::SqlitePoolManager;
use crate::triple_repo::TripleRepository;

#[derive(Clone)]
pub struct RelationalStore {
    pool_manager: SqlitePoolManager,
    memories: MemoryRepository,
    conversations: ConversationRepository,
    contexts: AgentContextRepository,
    triples: TripleRepository,
}

impl RelationalStore {
    /// Opens (creating if missing) the database and applies the schema.
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        schema::init(pool_manager.pool()).await?;

        let pool = pool_manager.pool().clone();
        info!("Relational store ready: {}", database_url);

        Ok(Self {
            memories: MemoryRepository::new(pool.clone()),
            conversations: ConversationRepository::new(pool.clone()),
            contexts: AgentContextRepository::new(pool.clone()),
            triples: TripleRepository::new(pool),
            pool_manager,
        })
    }

    pub fn memories(&self) -> &MemoryRepository {
        &self.memories
    }

    pub fn conversations(&self) -> &ConversationRepository {
        &self.conversations
    }

    pub fn contexts(&self) -> &AgentContextRepository {
        &self.contexts
    }

    pub fn triples(&self) -> &TripleRepository {
        &self.triples
    }

    /// Starts a store-level transaction for multi-step writes.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StorageError> {
        Ok(self.pool_manager.pool().begin().await?)
    }

    /// Underlying pool, for callers that need raw access (maintenance, test fixtures).
    pub fn pool(&self) -> &SqlitePool {
        self.pool_manager.pool()
    }

    pub async fn close(&self) {
        self.pool_manager.close().await;
    }
}
