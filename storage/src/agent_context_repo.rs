//! Agent context repository: one snapshot row per agent, replaced on every write.

use chrono::{DateTime, Utc};
use memory_core::{AgentContext, ContextMap};
use sqlx::SqlitePool;
use tracing::debug;

use crate::codec::{encode_json, encode_timestamp};
use crate::error::StorageError;
use crate::models::AgentContextRecord;

#[derive(Clone)]
pub struct AgentContextRepository {
    pool: SqlitePool,
}

impl AgentContextRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replaces the agent's snapshot in a single upsert statement.
    pub async fn upsert(
        &self,
        agent_id: &str,
        context: &ContextMap,
        active_memory_ids: &[String],
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO agent_contexts (agent_id, current_context, active_memory_ids, last_updated)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(agent_id) DO UPDATE SET
                current_context = excluded.current_context,
                active_memory_ids = excluded.active_memory_ids,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(agent_id)
        .bind(encode_json(context)?)
        .bind(encode_json(&active_memory_ids)?)
        .bind(encode_timestamp(&at))
        .execute(&self.pool)
        .await?;

        debug!(agent_id, "Replaced agent context");
        Ok(())
    }

    pub async fn get(&self, agent_id: &str) -> Result<Option<AgentContext>, StorageError> {
        let record = sqlx::query_as::<_, AgentContextRecord>(
            "SELECT * FROM agent_contexts WHERE agent_id = ?1",
        )
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(AgentContext::try_from).transpose()
    }
}
