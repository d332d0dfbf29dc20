//! # Retrieval Ranker
//!
//! Ranks an agent's memories against a query:
//!
//! ```text
//! similarity = cosine(query_vec, memory.embedding)          (0 for zero vectors)
//! recency    = max(floor, exp(-days_since(created_at) / decay_days))
//! score      = w_sim * similarity + w_imp * importance + w_rec * recency
//! ```
//!
//! Results are ordered by score descending, then newest `created_at`, then insertion order.
//! Exactly the returned memories get `access_count += 1` and `last_accessed_at = now`; that
//! bookkeeping is best-effort and never fails the retrieval.

use chrono::{DateTime, Utc};
use embedding::cosine_similarity;
use memory_core::{Memory, MemoryView, Result};
use std::cmp::Ordering;
use storage::RelationalStore;
use tracing::{debug, instrument, warn};

use crate::config::ScoringConfig;
use crate::embedder::Embedder;
use crate::validate;

/// Pure scoring function over a query vector and a candidate.
#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Decay factor in [floor, 1]. Timestamps in the future count as age zero.
    pub fn recency_factor(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let age_days = ((now - created_at).num_milliseconds() as f64 / 86_400_000.0).max(0.0);
        (-age_days / self.config.recency_decay_days)
            .exp()
            .max(self.config.recency_floor)
    }

    /// Returns `(similarity, score)`.
    pub fn score(&self, query_vec: &[f32], memory: &Memory, now: DateTime<Utc>) -> (f64, f64) {
        let similarity = cosine_similarity(query_vec, &memory.embedding) as f64;
        let similarity = if similarity.is_finite() { similarity } else { 0.0 };
        let recency = self.recency_factor(memory.created_at, now);

        let score = self.config.similarity_weight * similarity
            + self.config.importance_weight * memory.importance
            + self.config.recency_weight * recency;
        (similarity, score)
    }
}

struct Candidate {
    memory: Memory,
    similarity: f64,
    score: f64,
}

/// Scores an agent's memories against a query and returns the top results.
#[derive(Clone)]
pub struct RetrievalRanker {
    store: RelationalStore,
    embedder: Embedder,
    scorer: Scorer,
}

impl RetrievalRanker {
    pub fn new(store: RelationalStore, embedder: Embedder, scoring: ScoringConfig) -> Self {
        Self {
            store,
            embedder,
            scorer: Scorer::new(scoring),
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    #[instrument(skip(self, query_text), fields(query_len = query_text.len()))]
    pub async fn retrieve(
        &self,
        agent_id: &str,
        query_text: &str,
        limit: usize,
        memory_type: Option<&str>,
    ) -> Result<Vec<MemoryView>> {
        validate::non_empty("agent_id", agent_id)?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed(query_text).await?;
        let records = self.store.memories().list_by_agent(agent_id, memory_type).await?;
        let now = Utc::now();

        let mut candidates: Vec<Candidate> = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match Memory::try_from(record) {
                Ok(memory) => {
                    let (similarity, score) = self.scorer.score(&query_vec, &memory, now);
                    candidates.push(Candidate {
                        memory,
                        similarity,
                        score,
                    });
                }
                Err(e) => warn!("Skipping unreadable memory {}: {}", id, e),
            }
        }

        // Stable sort: equal score and created_at keep insertion order.
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.memory.created_at.cmp(&a.memory.created_at))
        });
        candidates.truncate(limit);

        let mut results = Vec::with_capacity(candidates.len());
        for mut candidate in candidates {
            match self.store.memories().record_access(&candidate.memory.id, now).await {
                Ok(true) => {
                    candidate.memory.access_count = candidate.memory.access_count.saturating_add(1);
                    candidate.memory.last_accessed_at = now;
                }
                Ok(false) => debug!("Access not recorded, memory {} was not updated", candidate.memory.id),
                Err(e) => warn!("Failed to record access for {}: {}", candidate.memory.id, e),
            }
            results.push(MemoryView::from_memory(
                candidate.memory,
                candidate.similarity,
                candidate.score,
            ));
        }

        debug!("Retrieved {} memories for agent {}", results.len(), agent_id);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use memory_core::Metadata;

    fn memory_at(importance: f64, embedding: Vec<f32>, created_at: DateTime<Utc>) -> Memory {
        let mut m = Memory::new("a1", "x", "fact", importance, embedding, Metadata::new());
        m.created_at = created_at;
        m
    }

    #[test]
    fn test_recency_factor_fresh_is_one() {
        let scorer = Scorer::new(ScoringConfig::default());
        let now = Utc::now();
        assert!((scorer.recency_factor(now, now) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_recency_factor_decays_and_floors() {
        let scorer = Scorer::new(ScoringConfig::default());
        let now = Utc::now();

        let thirty = scorer.recency_factor(now - Duration::days(30), now);
        assert!((thirty - (-1.0f64).exp()).abs() < 1e-6);

        let ancient = scorer.recency_factor(now - Duration::days(1000), now);
        assert_eq!(ancient, 0.1);
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let scorer = Scorer::new(ScoringConfig::default());
        let now = Utc::now();
        assert_eq!(scorer.recency_factor(now + Duration::days(3), now), 1.0);
    }

    #[test]
    fn test_score_formula() {
        let scorer = Scorer::new(ScoringConfig::default());
        let now = Utc::now();
        let m = memory_at(0.5, vec![1.0, 0.0], now);

        let (similarity, score) = scorer.score(&[1.0, 0.0], &m, now);
        assert!((similarity - 1.0).abs() < 1e-9);
        assert!((score - (0.6 + 0.15 + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_query_vector_has_zero_similarity() {
        let scorer = Scorer::new(ScoringConfig::default());
        let now = Utc::now();
        let m = memory_at(1.0, vec![1.0, 0.0], now);

        let (similarity, score) = scorer.score(&[0.0, 0.0], &m, now);
        assert_eq!(similarity, 0.0);
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_higher_importance_scores_higher() {
        let scorer = Scorer::new(ScoringConfig::default());
        let now = Utc::now();
        let low = memory_at(0.2, vec![0.6, 0.8], now);
        let high = memory_at(0.9, vec![0.6, 0.8], now);

        let (_, low_score) = scorer.score(&[1.0, 0.0], &low, now);
        let (_, high_score) = scorer.score(&[1.0, 0.0], &high, now);
        assert!(high_score > low_score);
    }
}
