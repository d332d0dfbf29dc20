//! Knowledge triple repository: idempotent upsert and filtered scans.

use memory_core::KnowledgeTriple;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StorageError;
use crate::models::{TripleQuery, TripleRecord};

#[derive(Clone)]
pub struct TripleRepository {
    pool: SqlitePool,
}

impl TripleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the triple or overwrites the row with the same id (last write wins).
    pub async fn upsert(&self, triple: &KnowledgeTriple) -> Result<(), StorageError> {
        let record = TripleRecord::from(triple);

        sqlx::query(
            r#"
            INSERT INTO knowledge_triples (id, subject, predicate, object, confidence, source_memory_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                confidence = excluded.confidence,
                source_memory_id = excluded.source_memory_id,
                created_at = excluded.created_at
            "#,
        )
        .bind(&record.id)
        .bind(&record.subject)
        .bind(&record.predicate)
        .bind(&record.object)
        .bind(record.confidence)
        .bind(&record.source_memory_id)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %record.id, confidence = record.confidence, "Upserted triple");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<KnowledgeTriple>, StorageError> {
        let record = sqlx::query_as::<_, TripleRecord>("SELECT * FROM knowledge_triples WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(KnowledgeTriple::try_from).transpose()
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM knowledge_triples WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Substring filters use `instr` so matching is case-sensitive (SQLite `LIKE` is not).
    /// Results are ordered by confidence descending.
    pub async fn query(&self, query: &TripleQuery) -> Result<Vec<KnowledgeTriple>, StorageError> {
        let mut sql = String::from("SELECT * FROM knowledge_triples WHERE confidence >= ?");
        let mut params: Vec<&str> = Vec::new();

        if let Some(subject) = &query.subject {
            sql.push_str(" AND instr(subject, ?) > 0");
            params.push(subject);
        }
        if let Some(predicate) = &query.predicate {
            sql.push_str(" AND instr(predicate, ?) > 0");
            params.push(predicate);
        }
        if let Some(object) = &query.object {
            sql.push_str(" AND instr(object, ?) > 0");
            params.push(object);
        }

        sql.push_str(" ORDER BY confidence DESC, created_at DESC");

        let mut query_builder = sqlx::query_as::<_, TripleRecord>(&sql).bind(query.min_confidence);
        for param in params {
            query_builder = query_builder.bind(param);
        }

        let records = query_builder.fetch_all(&self.pool).await?;
        debug!("Retrieved {} triples", records.len());

        records.into_iter().map(KnowledgeTriple::try_from).collect()
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM knowledge_triples")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
