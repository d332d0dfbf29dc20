//! Error taxonomy shared by every component of the memory subsystem.
//!
//! Read paths turn missing records into empty/default results; only operations that
//! require the target to exist (e.g. deleting a named memory) return [`MemoryError::NotFound`].

use thiserror::Error;

/// Errors surfaced to calling agents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    /// Malformed or missing required field (e.g. empty agent_id, importance out of range).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup by id that does not resolve, for operations that require the target.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Durable store unreachable or a transaction failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Embedding provider failed (only surfaced in strict mode).
    #[error("Embedding error: {0}")]
    Embedding(String),
}

impl MemoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
