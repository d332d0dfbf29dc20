//! Embedding step shared by every write and query.
//!
//! Wraps the pluggable [`EmbeddingService`] and enforces the fixed dimension. Provider failures
//! degrade to the zero vector ("no signal") unless strict mode is on.

use embedding::EmbeddingService;
use memory_core::{MemoryError, Result};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct Embedder {
    service: Arc<dyn EmbeddingService>,
    dimension: usize,
    strict: bool,
}

impl Embedder {
    pub fn new(service: Arc<dyn EmbeddingService>, dimension: usize, strict: bool) -> Self {
        Self {
            service,
            dimension,
            strict,
        }
    }

    /// Returns a vector of exactly `dimension` values.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self.try_embed(text).await {
            Ok(vector) => Ok(vector),
            Err(err) if self.strict => Err(err),
            Err(err) => {
                warn!("Embedding failed, storing zero vector: {}", err);
                Ok(vec![0.0; self.dimension])
            }
        }
    }

    async fn try_embed(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self
            .service
            .embed(text)
            .await
            .map_err(|e| MemoryError::Embedding(e.to_string()))?;

        if vector.len() != self.dimension {
            return Err(MemoryError::Embedding(format!(
                "expected {} dimensions, provider returned {}",
                self.dimension,
                vector.len()
            )));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(MemoryError::Embedding(
                "provider returned non-finite values".to_string(),
            ));
        }
        Ok(vector)
    }
}
