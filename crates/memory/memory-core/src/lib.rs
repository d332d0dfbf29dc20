//! # Memory Core
//!
//! Core types and the error taxonomy of the agent memory subsystem.
//! Used by the `storage` crate (persistence) and the `memory` crate (ranking, ledger, graph, sweeper).
//!
//! ## Modules
//!
//! - [`types`] - Memory, Conversation, AgentContext, KnowledgeTriple, MetadataValue
//! - [`view`] - MemoryView (retrieval result) and MemoryStats
//! - [`error`] - MemoryError and the crate-wide Result alias

pub mod error;
pub mod types;
pub mod view;

pub use error::{MemoryError, Result};
pub use types::*;
pub use view::*;
