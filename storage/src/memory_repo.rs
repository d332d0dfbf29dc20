//! Memory repository: persistence and scans for the `memories` table.
//!
//! Ranking and the retention policy live in the `memory` crate; this layer only exposes
//! record-shaped CRUD and the bulk scans they need.

use chrono::{DateTime, Utc};
use memory_core::Memory;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use crate::codec::encode_timestamp;
use crate::error::StorageError;
use crate::models::{MemoryRecord, SweepCandidate};

#[derive(Clone)]
pub struct MemoryRepository {
    pool: SqlitePool,
}

impl MemoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, memory: &Memory) -> Result<(), StorageError> {
        Self::insert_with(&self.pool, memory).await
    }

    /// Inserts using the given executor (pool, connection or open transaction).
    pub async fn insert_with<'e, E>(executor: E, memory: &Memory) -> Result<(), StorageError>
    where
        E: SqliteExecutor<'e>,
    {
        let record = MemoryRecord::try_from(memory)?;

        sqlx::query(
            r#"
            INSERT INTO memories (
                id, agent_id, content, memory_type, importance, embedding,
                metadata, created_at, last_accessed_at, access_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&record.id)
        .bind(&record.agent_id)
        .bind(&record.content)
        .bind(&record.memory_type)
        .bind(record.importance)
        .bind(&record.embedding)
        .bind(&record.metadata)
        .bind(&record.created_at)
        .bind(&record.last_accessed_at)
        .bind(record.access_count)
        .execute(executor)
        .await?;

        debug!(id = %record.id, agent_id = %record.agent_id, "Saved memory");
        Ok(())
    }

    /// Returns `None` when the id does not resolve.
    pub async fn get(&self, id: &str) -> Result<Option<Memory>, StorageError> {
        let record = sqlx::query_as::<_, MemoryRecord>("SELECT * FROM memories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Memory::try_from).transpose()
    }

    /// Returns whether a row was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM memories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All rows of an agent, optionally restricted to one memory type, in insertion order.
    pub async fn list_by_agent(
        &self,
        agent_id: &str,
        memory_type: Option<&str>,
    ) -> Result<Vec<MemoryRecord>, StorageError> {
        let records = match memory_type {
            Some(memory_type) => {
                sqlx::query_as::<_, MemoryRecord>(
                    "SELECT * FROM memories WHERE agent_id = ?1 AND memory_type = ?2 ORDER BY rowid",
                )
                .bind(agent_id)
                .bind(memory_type)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MemoryRecord>(
                    "SELECT * FROM memories WHERE agent_id = ?1 ORDER BY rowid",
                )
                .bind(agent_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!("Loaded {} memory rows for agent {}", records.len(), agent_id);
        Ok(records)
    }

    /// Increments `access_count` (saturating at `u32::MAX`) and stamps `last_accessed_at`.
    /// Returns `false` when the row no longer exists.
    pub async fn record_access(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE memories SET access_count = MIN(access_count + 1, ?3), last_accessed_at = ?1 WHERE id = ?2",
        )
        .bind(encode_timestamp(&at))
        .bind(id)
        .bind(i64::from(u32::MAX))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Rows below the importance bound that have been accessed fewer than `max_access_count` times.
    /// The age filter is applied by the caller so unparseable timestamps can be reported.
    pub async fn sweep_candidates(
        &self,
        min_importance: f64,
        max_access_count: i64,
    ) -> Result<Vec<SweepCandidate>, StorageError> {
        let candidates = sqlx::query_as::<_, SweepCandidate>(
            "SELECT id, created_at FROM memories WHERE importance < ?1 AND access_count < ?2 ORDER BY rowid",
        )
        .bind(min_importance)
        .bind(max_access_count)
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    /// Deletes the given ids in one transaction, re-checking the access bound so a row
    /// retrieved since the scan is kept. Returns the number of rows deleted.
    pub async fn delete_many(&self, ids: &[String], max_access_count: i64) -> Result<u64, StorageError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut deleted = 0;
        for id in ids {
            let result = sqlx::query("DELETE FROM memories WHERE id = ?1 AND access_count < ?2")
                .bind(id)
                .bind(max_access_count)
                .execute(&mut *tx)
                .await?;
            deleted += result.rows_affected();
        }
        tx.commit().await?;

        info!("Deleted {} memories", deleted);
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM memories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// (agent_id, count) pairs ordered by agent_id.
    pub async fn count_by_agent(&self) -> Result<Vec<(String, i64)>, StorageError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT agent_id, COUNT(*) FROM memories GROUP BY agent_id ORDER BY agent_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// (memory_type, count) pairs ordered by memory_type.
    pub async fn count_by_type(&self) -> Result<Vec<(String, i64)>, StorageError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT memory_type, COUNT(*) FROM memories GROUP BY memory_type ORDER BY memory_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
