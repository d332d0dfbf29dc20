//! Row shapes of the four tables.
//!
//! Records hold raw column values; `TryFrom<Record>` for the domain type performs decoding so
//! scans can skip a corrupt row without failing the whole read.

mod agent_context_record;
mod conversation_record;
mod memory_record;
mod triple_record;

pub use agent_context_record::AgentContextRecord;
pub use conversation_record::ConversationRecord;
pub use memory_record::{MemoryRecord, SweepCandidate};
pub use triple_record::{TripleQuery, TripleRecord};
