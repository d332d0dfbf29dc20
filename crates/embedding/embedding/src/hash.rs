//! Deterministic content-hash embedding.
//!
//! The SHA-256 digest of the text is read as two-hex-digit groups, each scaled to [0, 1],
//! zero-padded (or truncated) to the target dimension and L2-normalized. Carries no semantic
//! signal; it makes retrieval reproducible without a model.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::vector::normalize;
use crate::EmbeddingService;

/// Hash-based embedding provider.
#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Synchronous form of [`EmbeddingService::embed`].
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

        let mut vector: Vec<f32> = hex
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok())
            .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
            .map(|v| v as f32 / 255.0)
            .take(self.dimension)
            .collect();
        vector.resize(self.dimension, 0.0);

        normalize(&mut vector);
        vector
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl EmbeddingService for HashEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(self.embed_text(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::l2_norm;

    #[test]
    fn test_deterministic() {
        let e = HashEmbedding::default();
        let a = e.embed_text("The sky is blue");
        let b = e.embed_text("The sky is blue");
        assert_eq!(a, b);
    }

    #[test]
    fn test_dimension_and_norm() {
        let e = HashEmbedding::new(384);
        let v = e.embed_text("hello");
        assert_eq!(v.len(), 384);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_padding_is_zero() {
        let v = HashEmbedding::new(384).embed_text("hello");
        assert!(v[32..].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_truncates_to_small_dimension() {
        let v = HashEmbedding::new(8).embed_text("hello");
        assert_eq!(v.len(), 8);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_different_texts_differ() {
        let e = HashEmbedding::default();
        assert_ne!(e.embed_text("a"), e.embed_text("b"));
    }

    #[test]
    fn test_known_digest_prefix() {
        // sha256("abc") starts with ba7816bf
        let raw = HashEmbedding::new(4).embed_text("abc");
        let expected = {
            let mut v = vec![0xba as f32 / 255.0, 0x78 as f32 / 255.0, 0x16 as f32 / 255.0, 0xbf as f32 / 255.0];
            normalize(&mut v);
            v
        };
        for (a, b) in raw.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_service_embed_matches_sync() {
        let e = HashEmbedding::default();
        let via_trait = e.embed("text").await.unwrap();
        assert_eq!(via_trait, e.embed_text("text"));
        assert_eq!(e.dimension(), 384);
    }
}
