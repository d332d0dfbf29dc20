//! # Knowledge Graph
//!
//! Subject-predicate-object triples with confidence. A triple's id is derived from its three
//! terms, so asserting the same triple again overwrites confidence and source (last write
//! wins) instead of adding a row.

use memory_core::{KnowledgeTriple, MemoryError, Result};
use storage::{RelationalStore, TripleQuery};
use tracing::{debug, instrument};

use crate::validate;

/// Default inclusive confidence bound for queries.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

#[derive(Clone)]
pub struct KnowledgeGraph {
    store: RelationalStore,
}

impl KnowledgeGraph {
    pub fn new(store: RelationalStore) -> Self {
        Self { store }
    }

    /// Returns the triple id.
    #[instrument(skip(self))]
    pub async fn assert_triple(
        &self,
        subject: &str,
        predicate: &str,
        object: &str,
        confidence: f64,
        source_memory_id: Option<&str>,
    ) -> Result<String> {
        validate::non_empty("subject", subject)?;
        validate::non_empty("predicate", predicate)?;
        validate::non_empty("object", object)?;
        validate::unit_interval("confidence", confidence)?;

        let triple = KnowledgeTriple::new(
            subject,
            predicate,
            object,
            confidence,
            source_memory_id.map(str::to_string),
        );
        self.store.triples().upsert(&triple).await?;

        debug!(id = %triple.id, "Asserted triple");
        Ok(triple.id)
    }

    /// Case-sensitive substring match on each provided term, AND-combined; confidence bound
    /// inclusive; ordered by confidence descending.
    pub async fn query(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        min_confidence: f64,
    ) -> Result<Vec<KnowledgeTriple>> {
        if !min_confidence.is_finite() {
            return Err(MemoryError::validation("min_confidence must be finite"));
        }

        let query = TripleQuery {
            subject: subject.map(str::to_string),
            predicate: predicate.map(str::to_string),
            object: object.map(str::to_string),
            min_confidence,
        };
        Ok(self.store.triples().query(&query).await?)
    }

    pub async fn get(&self, triple_id: &str) -> Result<Option<KnowledgeTriple>> {
        Ok(self.store.triples().get(triple_id).await?)
    }

    /// Errors with [`MemoryError::NotFound`] when the triple does not exist.
    pub async fn delete(&self, triple_id: &str) -> Result<()> {
        if self.store.triples().delete(triple_id).await? {
            Ok(())
        } else {
            Err(MemoryError::not_found(format!("triple {}", triple_id)))
        }
    }
}
