//! Storage error types.
//!
//! Used by repository implementations and callers of storage APIs.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// A persisted row could not be turned back into a domain value.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound("row not found".to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                StorageError::Decode(format!("column {}: {}", index, source))
            }
            other => StorageError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for memory_core::MemoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => memory_core::MemoryError::NotFound(msg),
            other => memory_core::MemoryError::Storage(other.to_string()),
        }
    }
}
