//! # Core Types
//!
//! Record kinds persisted by the memory subsystem.
//!
//! | Type | Identity | Mutability |
//! |------|----------|------------|
//! | [`Memory`] | random UUID per write | only `access_count` / `last_accessed_at` |
//! | [`Conversation`] | random UUID per write | immutable |
//! | [`AgentContext`] | `agent_id` | full replace (upsert) |
//! | [`KnowledgeTriple`] | UUID v5 of subject/predicate/object | upsert, last write wins |
//!
//! ## Example
//!
//! ```rust
//! use memory_core::{Memory, Metadata, MetadataValue};
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("source".to_string(), MetadataValue::from("chat"));
//!
//! let memory = Memory::new("agent-1", "The sky is blue", "fact", 0.5, vec![0.0; 4], metadata);
//! assert_eq!(memory.access_count, 0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Embedding dimension of every stored memory.
pub const EMBEDDING_DIM: usize = 384;

/// Importance applied when the caller does not supply one.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// Memory type of records mirrored from conversations.
pub const CONVERSATION_MEMORY_TYPE: &str = "conversation";

/// Importance of records mirrored from conversations.
pub const CONVERSATION_IMPORTANCE: f64 = 0.7;

/// Namespace for content-addressed triple ids.
const TRIPLE_NAMESPACE: Uuid = Uuid::from_u128(0x6b6e_6f77_6c65_4467_a000_7472_6970_6c65);

/// Scalar metadata value: string, number or bool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

/// Open map of scalar values attached to a memory. Opaque to the subsystem.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Opaque JSON object carried by conversations and agent context snapshots.
pub type ContextMap = serde_json::Map<String, serde_json::Value>;

/// A single stored observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    pub id: String,
    pub agent_id: String,
    pub content: String,
    pub memory_type: String,
    /// In [0.0, 1.0].
    pub importance: f64,
    /// Exactly [`EMBEDDING_DIM`] values when produced by the subsystem.
    pub embedding: Vec<f32>,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u32,
}

impl Memory {
    /// Creates a new memory with a random UUID, stamped now, never accessed.
    pub fn new(
        agent_id: impl Into<String>,
        content: impl Into<String>,
        memory_type: impl Into<String>,
        importance: f64,
        embedding: Vec<f32>,
        metadata: Metadata,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            agent_id: agent_id.into(),
            content: content.into(),
            memory_type: memory_type.into(),
            importance,
            embedding,
            metadata,
            created_at: now,
            last_accessed_at: now,
            access_count: 0,
        }
    }
}

/// A message/response exchange within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub session_id: String,
    pub agent_id: String,
    pub message: String,
    pub response: String,
    pub context: ContextMap,
    pub timestamp: DateTime<Utc>,
}

impl Conversation {
    pub fn new(
        session_id: impl Into<String>,
        agent_id: impl Into<String>,
        message: impl Into<String>,
        response: impl Into<String>,
        context: ContextMap,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            agent_id: agent_id.into(),
            message: message.into(),
            response: response.into(),
            context,
            timestamp: Utc::now(),
        }
    }

    /// Text stored in the mirrored memory record.
    pub fn render(&self) -> String {
        format!("User: {}\nAgent: {}", self.message, self.response)
    }
}

/// Latest working-context snapshot of one agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentContext {
    pub agent_id: String,
    pub current_context: ContextMap,
    pub active_memory_ids: Vec<String>,
    /// `None` when no snapshot was ever written.
    pub last_updated: Option<DateTime<Utc>>,
}

impl AgentContext {
    /// Default returned for agents without a snapshot.
    pub fn empty(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            current_context: ContextMap::new(),
            active_memory_ids: Vec::new(),
            last_updated: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_updated.is_none()
    }
}

/// Subject-predicate-object fact with confidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeTriple {
    pub id: String,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    /// In [0.0, 1.0].
    pub confidence: f64,
    /// Memory the triple was extracted from. Not enforced as a foreign key.
    pub source_memory_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl KnowledgeTriple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        confidence: f64,
        source_memory_id: Option<String>,
    ) -> Self {
        let subject = subject.into();
        let predicate = predicate.into();
        let object = object.into();
        Self {
            id: Self::id_for(&subject, &predicate, &object),
            subject,
            predicate,
            object,
            confidence,
            source_memory_id,
            created_at: Utc::now(),
        }
    }

    /// Deterministic id: the same (subject, predicate, object) always maps to the same id.
    pub fn id_for(subject: &str, predicate: &str, object: &str) -> String {
        // Unit separator keeps ("ab", "c") and ("a", "bc") apart.
        let key = format!("{}\u{1f}{}\u{1f}{}", subject, predicate, object);
        Uuid::new_v5(&TRIPLE_NAMESPACE, key.as_bytes()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_id_is_deterministic() {
        let a = KnowledgeTriple::new("sky", "has_color", "blue", 0.9, None);
        let b = KnowledgeTriple::new("sky", "has_color", "blue", 0.2, Some("m1".to_string()));
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_triple_id_separates_fields() {
        assert_ne!(
            KnowledgeTriple::id_for("ab", "c", "d"),
            KnowledgeTriple::id_for("a", "bc", "d")
        );
    }

    #[test]
    fn test_memory_ids_are_unique() {
        let a = Memory::new("a1", "same", "fact", 0.5, vec![], Metadata::new());
        let b = Memory::new("a1", "same", "fact", 0.5, vec![], Metadata::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_conversation_render() {
        let conv = Conversation::new("s1", "a1", "hi", "hello", ContextMap::new());
        assert_eq!(conv.render(), "User: hi\nAgent: hello");
    }

    #[test]
    fn test_metadata_value_serde() {
        let mut metadata = Metadata::new();
        metadata.insert("name".to_string(), MetadataValue::from("x"));
        metadata.insert("count".to_string(), MetadataValue::from(3i64));
        metadata.insert("flag".to_string(), MetadataValue::from(true));

        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"count":3.0,"flag":true,"name":"x"}"#);

        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_empty_agent_context() {
        let ctx = AgentContext::empty("a1");
        assert!(ctx.is_empty());
        assert!(ctx.current_context.is_empty());
        assert!(ctx.active_memory_ids.is_empty());
    }
}
