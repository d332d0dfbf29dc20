//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;
use std::sync::Arc;

use crate::{EmbeddingService, HashEmbedding};

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn provider(&self) -> &str;
    /// Vector length the provider must produce.
    fn dimension(&self) -> usize;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub embedding_provider: String,
    pub embedding_dim: usize,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn provider(&self) -> &str {
        &self.embedding_provider
    }
    fn dimension(&self) -> usize {
        self.embedding_dim
    }
}

impl Default for EnvEmbeddingConfig {
    fn default() -> Self {
        Self {
            embedding_provider: "hash".to_string(),
            embedding_dim: 384,
        }
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables (EMBEDDING_PROVIDER, EMBEDDING_DIM).
    pub fn from_env() -> Result<Self> {
        let embedding_provider =
            env::var("EMBEDDING_PROVIDER").unwrap_or_else(|_| "hash".to_string());
        let embedding_dim = match env::var("EMBEDDING_DIM") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("EMBEDDING_DIM is not a valid number ({}): {}", raw, e))?,
            Err(_) => 384,
        };
        Ok(Self {
            embedding_provider,
            embedding_dim,
        })
    }

    /// Validate config (known provider, non-zero dimension).
    pub fn validate(&self) -> Result<()> {
        if !self.embedding_provider.eq_ignore_ascii_case("hash") {
            anyhow::bail!(
                "EMBEDDING_PROVIDER={} is not supported; available providers: hash",
                self.embedding_provider
            );
        }
        if self.embedding_dim == 0 {
            anyhow::bail!("EMBEDDING_DIM must be greater than zero");
        }
        Ok(())
    }

    /// Builds the configured provider.
    pub fn build_service(&self) -> Result<Arc<dyn EmbeddingService>> {
        self.validate()?;
        Ok(Arc::new(HashEmbedding::new(self.embedding_dim)))
    }
}
