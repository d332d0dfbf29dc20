//! Agent context store: latest working-context snapshot and active memory ids per agent.
//!
//! Writes replace the whole snapshot. Reading an agent that never wrote one returns
//! [`AgentContext::empty`], which is a normal result.

use chrono::Utc;
use memory_core::{AgentContext, ContextMap, Result};
use storage::RelationalStore;
use tracing::{debug, instrument};

use crate::validate;

#[derive(Clone)]
pub struct AgentContextStore {
    store: RelationalStore,
}

impl AgentContextStore {
    pub fn new(store: RelationalStore) -> Self {
        Self { store }
    }

    #[instrument(skip(self, context, active_memory_ids), fields(active = active_memory_ids.len()))]
    pub async fn update(
        &self,
        agent_id: &str,
        context: &ContextMap,
        active_memory_ids: &[String],
    ) -> Result<bool> {
        validate::non_empty("agent_id", agent_id)?;
        self.store
            .contexts()
            .upsert(agent_id, context, active_memory_ids, Utc::now())
            .await?;
        Ok(true)
    }

    pub async fn get(&self, agent_id: &str) -> Result<AgentContext> {
        validate::non_empty("agent_id", agent_id)?;
        match self.store.contexts().get(agent_id).await? {
            Some(snapshot) => Ok(snapshot),
            None => {
                debug!("No context snapshot for agent {}", agent_id);
                Ok(AgentContext::empty(agent_id))
            }
        }
    }
}
