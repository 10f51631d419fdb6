//! Concurrency-safe registry owning live agent instances.
#![allow(dead_code)]

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::agent::{Agent, AgentType};
use crate::error::{Error, Result};

/// Registration-ordered store mapping agent identity to a live instance.
///
/// The registry owns the lifecycle of every agent it holds: registration
/// starts the agent, removal shuts it down. All mutations serialize on the
/// write lock; readers never observe an agent that is present but not yet
/// started.
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<Vec<Arc<dyn Agent>>>,
}

/// Summary row returned by [`AgentRegistry::list_agents`].
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub agent_id: String,
    pub agent_type: AgentType,
    pub capabilities: Vec<String>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: RwLock::new(Vec::new()),
        }
    }

    /// Register an agent and start it.
    ///
    /// Insertion and startup happen under one write section, so a concurrent
    /// register for the same identity cannot interleave.
    pub async fn register(&self, agent: Arc<dyn Agent>) -> Result<()> {
        let mut agents = self.agents.write().await;
        if agents.iter().any(|a| a.agent_id() == agent.agent_id()) {
            return Err(Error::DuplicateAgent(agent.agent_id().to_string()));
        }
        agents.push(agent.clone());
        agent.startup().await;
        tracing::info!(
            "Registered agent {} ({})",
            agent.agent_id(),
            agent.agent_type()
        );
        Ok(())
    }

    /// Remove an agent and shut it down. Absent identities are a no-op.
    pub async fn deregister(&self, agent_id: &str) {
        let mut agents = self.agents.write().await;
        if let Some(pos) = agents.iter().position(|a| a.agent_id() == agent_id) {
            let agent = agents.remove(pos);
            agent.shutdown().await;
            tracing::info!("Deregistered agent {}", agent_id);
        }
    }

    /// Look up an agent by identity.
    pub async fn get(&self, agent_id: &str) -> Option<Arc<dyn Agent>> {
        self.agents
            .read()
            .await
            .iter()
            .find(|a| a.agent_id() == agent_id)
            .cloned()
    }

    /// All agents of a type, in registration order.
    pub async fn get_by_type(&self, agent_type: AgentType) -> Vec<Arc<dyn Agent>> {
        self.agents
            .read()
            .await
            .iter()
            .filter(|a| a.agent_type() == agent_type)
            .cloned()
            .collect()
    }

    /// Number of currently registered agents.
    pub async fn count(&self) -> usize {
        self.agents.read().await.len()
    }

    /// Identity, type, and capabilities of every registered agent.
    pub async fn list_agents(&self) -> Vec<AgentSummary> {
        self.agents
            .read()
            .await
            .iter()
            .map(|a| {
                let metadata = a.metadata();
                AgentSummary {
                    agent_id: metadata.agent_id.clone(),
                    agent_type: metadata.agent_type,
                    capabilities: metadata.capabilities.clone(),
                }
            })
            .collect()
    }

    /// Shut down every registered agent and empty the store.
    pub async fn shutdown_all(&self) {
        let mut agents = self.agents.write().await;
        for agent in agents.drain(..) {
            agent.shutdown().await;
        }
        tracing::info!("All agents shut down");
    }
}
