//! Storage crate: durable, schema-backed persistence for the memory subsystem.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Row shapes of the four tables and their conversion to domain types
//! - [`memory_repo`] – MemoryRepository (`memories`)
//! - [`conversation_repo`] – ConversationRepository (`conversations`)
//! - [`agent_context_repo`] – AgentContextRepository (`agent_contexts`)
//! - [`triple_repo`] – TripleRepository (`knowledge_triples`)
//! - [`store`] – RelationalStore bundling the repositories over one pool
//! - [`sqlite_pool`] – SqlitePoolManager
//!
//! Every write is a single-row statement or runs inside one `sqlx::Transaction`; repository
//! functions that end in `_with` accept any executor so callers can compose them in a transaction.

mod agent_context_repo;
mod codec;
mod conversation_repo;
mod error;
mod memory_repo;
mod models;
mod schema;
mod sqlite_pool;
mod store;
mod triple_repo;

pub use agent_context_repo::AgentContextRepository;
pub use conversation_repo::ConversationRepository;
pub use error::StorageError;
pub use memory_repo::MemoryRepository;
pub use models::{
    AgentContextRecord, ConversationRecord, MemoryRecord, SweepCandidate, TripleQuery,
    TripleRecord,
};
pub use sqlite_pool::SqlitePoolManager;
pub use store::RelationalStore;
