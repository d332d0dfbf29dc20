//! Knowledge triple model and query filter.
//!
//! Maps to the `knowledge_triples` table.

use memory_core::KnowledgeTriple;
use serde::{Deserialize, Serialize};

use crate::codec::{decode_timestamp, encode_timestamp};
use crate::error::StorageError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TripleRecord {
    pub id: String,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub confidence: f64,
    pub source_memory_id: Option<String>,
    pub created_at: String,
}

impl From<&KnowledgeTriple> for TripleRecord {
    fn from(triple: &KnowledgeTriple) -> Self {
        Self {
            id: triple.id.clone(),
            subject: triple.subject.clone(),
            predicate: triple.predicate.clone(),
            object: triple.object.clone(),
            confidence: triple.confidence,
            source_memory_id: triple.source_memory_id.clone(),
            created_at: encode_timestamp(&triple.created_at),
        }
    }
}

impl TryFrom<TripleRecord> for KnowledgeTriple {
    type Error = StorageError;

    fn try_from(record: TripleRecord) -> Result<Self, Self::Error> {
        Ok(KnowledgeTriple {
            created_at: decode_timestamp(&record.created_at)?,
            id: record.id,
            subject: record.subject,
            predicate: record.predicate,
            object: record.object,
            confidence: record.confidence,
            source_memory_id: record.source_memory_id,
        })
    }
}

/// Filter for triple queries. Each provided field is a case-sensitive substring match;
/// all provided fields must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripleQuery {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
    /// Inclusive lower bound on confidence.
    pub min_confidence: f64,
}
