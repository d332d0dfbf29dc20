//! # AgentMemory
//!
//! The programmatic surface agents call: memories, conversations, context snapshots,
//! knowledge triples, retention and statistics, all over one explicit [`RelationalStore`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedding::HashEmbedding;
//! use memory::{AgentMemory, MemoryConfig, NewMemory};
//! use std::sync::Arc;
//!
//! # async fn example() -> memory_core::Result<()> {
//! let config = MemoryConfig::default().with_database_url("agent_memory.db");
//! let memory = AgentMemory::open(config, Arc::new(HashEmbedding::new(384))).await?;
//!
//! let id = memory
//!     .store_memory(NewMemory::new("A1", "The sky is blue", "fact").with_importance(0.5))
//!     .await?;
//! let results = memory.retrieve_memories("A1", "sky color", 1, None).await?;
//! assert_eq!(results[0].id, id);
//! # Ok(())
//! # }
//! ```

use embedding::EmbeddingService;
use memory_core::{
    AgentContext, Conversation, ContextMap, KnowledgeTriple, Memory, MemoryError, MemoryStats,
    MemoryView, Metadata, MetadataValue, Result, DEFAULT_IMPORTANCE,
};
use std::sync::Arc;
use storage::RelationalStore;
use tracing::{info, instrument};

use crate::agent_context::AgentContextStore;
use crate::config::MemoryConfig;
use crate::embedder::Embedder;
use crate::knowledge::KnowledgeGraph;
use crate::ledger::ConversationLedger;
use crate::ranker::RetrievalRanker;
use crate::retention::{CleanupReport, RetentionSweeper};
use crate::validate;

/// Input of [`AgentMemory::store_memory`].
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub agent_id: String,
    pub content: String,
    pub memory_type: String,
    pub importance: f64,
    pub metadata: Metadata,
}

impl NewMemory {
    /// Importance defaults to 0.5, metadata to empty.
    pub fn new(
        agent_id: impl Into<String>,
        content: impl Into<String>,
        memory_type: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            content: content.into(),
            memory_type: memory_type.into(),
            importance: DEFAULT_IMPORTANCE,
            metadata: Metadata::new(),
        }
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone)]
pub struct AgentMemory {
    store: RelationalStore,
    embedder: Embedder,
    config: MemoryConfig,
    ranker: RetrievalRanker,
    ledger: ConversationLedger,
    contexts: AgentContextStore,
    graph: KnowledgeGraph,
    sweeper: RetentionSweeper,
}

impl AgentMemory {
    /// Validates the config, opens the store at `config.database_url` and wires the components.
    pub async fn open(config: MemoryConfig, embedding: Arc<dyn EmbeddingService>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| MemoryError::validation(e.to_string()))?;
        let store = RelationalStore::open(&config.database_url).await?;
        Ok(Self::new(store, embedding, config))
    }

    /// Wires the components over an already opened store.
    pub fn new(store: RelationalStore, embedding: Arc<dyn EmbeddingService>, config: MemoryConfig) -> Self {
        let embedder = Embedder::new(embedding, config.embedding_dim, config.strict_embedding);
        Self {
            ranker: RetrievalRanker::new(store.clone(), embedder.clone(), config.scoring.clone()),
            ledger: ConversationLedger::new(store.clone(), embedder.clone()),
            contexts: AgentContextStore::new(store.clone()),
            graph: KnowledgeGraph::new(store.clone()),
            sweeper: RetentionSweeper::new(store.clone(), config.retention_access_threshold),
            store,
            embedder,
            config,
        }
    }

    pub fn store(&self) -> &RelationalStore {
        &self.store
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn ranker(&self) -> &RetrievalRanker {
        &self.ranker
    }

    pub fn knowledge_graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    /// Embeds and persists a memory; returns its id.
    #[instrument(skip(self, memory), fields(agent_id = %memory.agent_id, memory_type = %memory.memory_type))]
    pub async fn store_memory(&self, memory: NewMemory) -> Result<String> {
        validate::non_empty("agent_id", &memory.agent_id)?;
        validate::non_empty("memory_type", &memory.memory_type)?;
        validate::unit_interval("importance", memory.importance)?;

        let embedding = self.embedder.embed(&memory.content).await?;
        let record = Memory::new(
            memory.agent_id,
            memory.content,
            memory.memory_type,
            memory.importance,
            embedding,
            memory.metadata,
        );
        self.store.memories().insert(&record).await?;

        info!(id = %record.id, "Stored memory");
        Ok(record.id)
    }

    /// Top `limit` memories of the agent for the query, optionally restricted to one type.
    pub async fn retrieve_memories(
        &self,
        agent_id: &str,
        query_text: &str,
        limit: usize,
        memory_type: Option<&str>,
    ) -> Result<Vec<MemoryView>> {
        self.ranker.retrieve(agent_id, query_text, limit, memory_type).await
    }

    /// Read path: `None` when the id does not resolve.
    pub async fn get_memory(&self, memory_id: &str) -> Result<Option<Memory>> {
        Ok(self.store.memories().get(memory_id).await?)
    }

    /// Errors with [`MemoryError::NotFound`] when the memory does not exist.
    pub async fn delete_memory(&self, memory_id: &str) -> Result<()> {
        if self.store.memories().delete(memory_id).await? {
            info!(memory_id, "Deleted memory");
            Ok(())
        } else {
            Err(MemoryError::not_found(format!("memory {}", memory_id)))
        }
    }

    /// Records the exchange and its mirrored memory atomically; returns the conversation id.
    pub async fn store_conversation(
        &self,
        session_id: &str,
        agent_id: &str,
        message: &str,
        response: &str,
        context: ContextMap,
    ) -> Result<String> {
        let entry = self
            .ledger
            .record(session_id, agent_id, message, response, context)
            .await?;
        Ok(entry.conversation_id)
    }

    pub async fn get_conversation_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<Conversation>> {
        self.ledger.history(session_id, limit).await
    }

    pub async fn update_agent_context(
        &self,
        agent_id: &str,
        context: &ContextMap,
        active_memory_ids: &[String],
    ) -> Result<bool> {
        self.contexts.update(agent_id, context, active_memory_ids).await
    }

    pub async fn get_agent_context(&self, agent_id: &str) -> Result<AgentContext> {
        self.contexts.get(agent_id).await
    }

    pub async fn assert_triple(
        &self,
        subject: &str,
        predicate: &str,
        object: &str,
        confidence: f64,
        source_memory_id: Option<&str>,
    ) -> Result<String> {
        self.graph
            .assert_triple(subject, predicate, object, confidence, source_memory_id)
            .await
    }

    pub async fn query_triples(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        min_confidence: f64,
    ) -> Result<Vec<KnowledgeTriple>> {
        self.graph.query(subject, predicate, object, min_confidence).await
    }

    /// Errors with [`MemoryError::NotFound`] when the triple does not exist.
    pub async fn delete_triple(&self, triple_id: &str) -> Result<()> {
        self.graph.delete(triple_id).await
    }

    /// Runs the retention policy; returns the number of deleted memories.
    pub async fn cleanup(&self, max_age_days: i64, min_importance: f64) -> Result<u64> {
        Ok(self.cleanup_report(max_age_days, min_importance).await?.deleted)
    }

    /// Like [`AgentMemory::cleanup`] but also reports rows skipped as unreadable.
    pub async fn cleanup_report(&self, max_age_days: i64, min_importance: f64) -> Result<CleanupReport> {
        self.sweeper.sweep(max_age_days, min_importance).await
    }

    pub async fn get_statistics(&self) -> Result<MemoryStats> {
        let memories = self.store.memories();
        Ok(MemoryStats {
            total_memories: memories.count().await?,
            total_conversations: self.store.conversations().count().await?,
            total_triples: self.store.triples().count().await?,
            per_agent_counts: memories.count_by_agent().await?.into_iter().collect(),
            memories_by_type: memories.count_by_type().await?.into_iter().collect(),
        })
    }
}
