//! Memory subsystem configuration: scoring constants, retention threshold, storage location.
//!
//! Defaults carry the values existing data was ranked with (0.6 / 0.3 / 0.1 weights,
//! 30-day recency decay floored at 0.1, access-count override at 5).

use anyhow::Result;
use std::env;

/// Ranking weights and recency shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub similarity_weight: f64,
    pub importance_weight: f64,
    pub recency_weight: f64,
    /// Days for the recency factor to decay by a factor of e.
    pub recency_decay_days: f64,
    /// Lower bound of the recency factor.
    pub recency_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.6,
            importance_weight: 0.3,
            recency_weight: 0.1,
            recency_decay_days: 30.0,
            recency_floor: 0.1,
        }
    }
}

/// Top-level configuration of [`crate::AgentMemory`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    /// SQLite file path, `sqlite:` URL, or `sqlite::memory:`.
    pub database_url: String,
    pub embedding_dim: usize,
    pub scoring: ScoringConfig,
    /// Memories accessed at least this many times are never swept.
    pub retention_access_threshold: u32,
    pub default_limit: usize,
    /// Fail writes when the embedding provider fails instead of storing a zero vector.
    pub strict_embedding: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            database_url: "agent_memory.db".to_string(),
            embedding_dim: memory_core::EMBEDDING_DIM,
            scoring: ScoringConfig::default(),
            retention_access_threshold: 5,
            default_limit: 10,
            strict_embedding: false,
        }
    }
}

impl MemoryConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// MEMORY_DATABASE_URL, MEMORY_EMBEDDING_DIM, MEMORY_STRICT_EMBEDDING,
    /// MEMORY_RECENCY_DECAY_DAYS.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let database_url = env::var("MEMORY_DATABASE_URL").unwrap_or(defaults.database_url);
        let embedding_dim = parse_env("MEMORY_EMBEDDING_DIM")?.unwrap_or(defaults.embedding_dim);
        let strict_embedding = env::var("MEMORY_STRICT_EMBEDDING")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.strict_embedding);
        let recency_decay_days = parse_env("MEMORY_RECENCY_DECAY_DAYS")?
            .unwrap_or(defaults.scoring.recency_decay_days);

        Ok(Self {
            database_url,
            embedding_dim,
            strict_embedding,
            scoring: ScoringConfig {
                recency_decay_days,
                ..defaults.scoring
            },
            ..defaults
        })
    }

    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    pub fn with_strict_embedding(mut self, strict: bool) -> Self {
        self.strict_embedding = strict;
        self
    }

    /// Validate config (finite non-negative weights, positive decay, non-zero dimension).
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("MEMORY_DATABASE_URL must not be empty");
        }
        if self.embedding_dim == 0 {
            anyhow::bail!("embedding_dim must be greater than zero");
        }
        let s = &self.scoring;
        for (name, weight) in [
            ("similarity_weight", s.similarity_weight),
            ("importance_weight", s.importance_weight),
            ("recency_weight", s.recency_weight),
            ("recency_floor", s.recency_floor),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                anyhow::bail!("{} must be a finite non-negative number, got {}", name, weight);
            }
        }
        if !s.recency_decay_days.is_finite() || s.recency_decay_days <= 0.0 {
            anyhow::bail!(
                "recency_decay_days must be positive, got {}",
                s.recency_decay_days
            );
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} is not valid ({}): {}", key, raw, e)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MemoryConfig::default();
        assert_eq!(config.scoring.similarity_weight, 0.6);
        assert_eq!(config.scoring.importance_weight, 0.3);
        assert_eq!(config.scoring.recency_weight, 0.1);
        assert_eq!(config.scoring.recency_decay_days, 30.0);
        assert_eq!(config.scoring.recency_floor, 0.1);
        assert_eq!(config.retention_access_threshold, 5);
        assert_eq!(config.embedding_dim, 384);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MemoryConfig::default();
        config.scoring.recency_decay_days = 0.0;
        assert!(config.validate().is_err());

        let mut config = MemoryConfig::default();
        config.scoring.importance_weight = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = MemoryConfig::default();
        config.embedding_dim = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = MemoryConfig::default()
            .with_database_url("sqlite::memory:")
            .with_strict_embedding(true);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.strict_embedding);
    }
}
