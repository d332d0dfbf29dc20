//! Conversation repository: persistence and session history for the `conversations` table.

use memory_core::Conversation;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::StorageError;
use crate::models::ConversationRecord;

#[derive(Clone)]
pub struct ConversationRepository {
    pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts using the given executor. The ledger passes an open transaction so the
    /// conversation row and its mirrored memory commit together.
    pub async fn insert_with<'e, E>(executor: E, conversation: &Conversation) -> Result<(), StorageError>
    where
        E: SqliteExecutor<'e>,
    {
        let record = ConversationRecord::try_from(conversation)?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, session_id, agent_id, message, response, context, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.session_id)
        .bind(&record.agent_id)
        .bind(&record.message)
        .bind(&record.response)
        .bind(&record.context)
        .bind(&record.timestamp)
        .execute(executor)
        .await?;

        debug!(id = %record.id, session_id = %record.session_id, "Saved conversation");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Conversation>, StorageError> {
        let record = sqlx::query_as::<_, ConversationRecord>("SELECT * FROM conversations WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Conversation::try_from).transpose()
    }

    /// Most recent conversations of a session, newest first.
    pub async fn list_by_session(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<Conversation>, StorageError> {
        let records = sqlx::query_as::<_, ConversationRecord>(
            "SELECT * FROM conversations WHERE session_id = ?1 ORDER BY timestamp DESC, rowid DESC LIMIT ?2",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(Conversation::try_from).collect()
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
