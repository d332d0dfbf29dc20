//! # Memory Crate
//!
//! Long-term memory for conversational agents: scored semantic retrieval, an atomic
//! conversation ledger, per-agent context snapshots, a knowledge-triple store and a
//! retention sweeper, all persisted through [`storage::RelationalStore`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use embedding::HashEmbedding;
//! use memory::{AgentMemory, MemoryConfig, NewMemory};
//! use std::sync::Arc;
//!
//! # async fn example() -> memory_core::Result<()> {
//! let memory = AgentMemory::open(MemoryConfig::default(), Arc::new(HashEmbedding::default())).await?;
//! memory.store_memory(NewMemory::new("A1", "The sky is blue", "fact")).await?;
//! let top = memory.retrieve_memories("A1", "sky color", 5, None).await?;
//! # let _ = top;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`facade`] - [`AgentMemory`], the operations agents call
//! - [`ranker`] - Composite scoring and top-k retrieval
//! - [`ledger`] - Conversation plus mirrored memory in one transaction
//! - [`agent_context`] - Latest context snapshot per agent
//! - [`knowledge`] - Subject-predicate-object triples
//! - [`retention`] - Age, importance and access based cleanup
//! - [`embedder`] - Dimension checks and the non-strict zero-vector fallback
//! - [`config`] - Environment driven configuration

pub mod agent_context;
pub mod config;
pub mod embedder;
pub mod facade;
pub mod knowledge;
pub mod ledger;
pub mod ranker;
pub mod retention;
mod validate;

pub use agent_context::AgentContextStore;
pub use config::{MemoryConfig, ScoringConfig};
pub use embedder::Embedder;
pub use facade::{AgentMemory, NewMemory};
pub use knowledge::{KnowledgeGraph, DEFAULT_MIN_CONFIDENCE};
pub use ledger::{ConversationLedger, LedgerEntry};
pub use ranker::{RetrievalRanker, Scorer};
pub use retention::{CleanupReport, RetentionSweeper, DEFAULT_MAX_AGE_DAYS, DEFAULT_MIN_IMPORTANCE};
