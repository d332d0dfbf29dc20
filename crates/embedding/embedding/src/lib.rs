//! # Text Embeddings
//!
//! This crate defines the embedding service interface used by the memory subsystem,
//! the deterministic [`HashEmbedding`] reference implementation and the vector helpers
//! used by ranking.
//!
//! A production deployment substitutes a semantic model behind [`EmbeddingService`];
//! ranking logic never depends on the concrete provider.

use async_trait::async_trait;

mod config;
mod hash;
pub mod vector;

pub use config::{EmbeddingConfig, EnvEmbeddingConfig};
pub use hash::HashEmbedding;
pub use vector::{cosine_similarity, l2_norm, normalize};

/// Service for generating text embeddings.
///
/// Implementations must be pure functions of the input text and return vectors of
/// [`EmbeddingService::dimension`] values, L2-normalized (or all zeros for "no signal").
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Length of every vector this service returns.
    fn dimension(&self) -> usize;
}
