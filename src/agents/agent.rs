//! Agent contract: message handling plus lifecycle hooks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::{Message, Response};

/// Agent variant tag, used for capability-based lookup in the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Routes task requests to task agents
    Coordinator,
    /// Executes work and reports results
    Task,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Coordinator => "coordinator",
            AgentType::Task => "task",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable metadata attached to every agent at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMetadata {
    /// Unique agent ID (UUID v4), the registry key
    pub agent_id: String,
    pub agent_type: AgentType,
    pub created_at: DateTime<Utc>,
    pub capabilities: Vec<String>,
}

impl AgentMetadata {
    pub fn new(agent_type: AgentType, capabilities: &[&str]) -> Self {
        Self {
            agent_id: uuid::Uuid::new_v4().to_string(),
            agent_type,
            created_at: Utc::now(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Lifecycle status reported by a health check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Stopped,
}

/// Health snapshot derived purely from in-memory state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub agent_id: String,
    pub agent_type: AgentType,
    pub status: HealthStatus,
    pub capabilities: Vec<String>,
}

/// Contract every agent satisfies.
///
/// Concrete agents own their running flag; `startup` and `shutdown` flip it
/// and are only invoked by the registry, which serializes lifecycle
/// transitions. `handle` makes no cross-call ordering promise beyond what
/// the implementation guarantees.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Immutable metadata assigned at construction.
    fn metadata(&self) -> &AgentMetadata;

    /// Whether the agent is currently registered and started.
    fn is_running(&self) -> bool;

    /// Process an incoming message and produce a response.
    async fn handle(&self, message: &Message) -> Result<Response>;

    /// Lifecycle hook invoked when the registry accepts the agent.
    async fn startup(&self);

    /// Lifecycle hook invoked when the registry removes the agent.
    async fn shutdown(&self);

    fn agent_id(&self) -> &str {
        &self.metadata().agent_id
    }

    fn agent_type(&self) -> AgentType {
        self.metadata().agent_type
    }

    /// Health snapshot. Never fails.
    fn health_check(&self) -> HealthReport {
        let metadata = self.metadata();
        HealthReport {
            agent_id: metadata.agent_id.clone(),
            agent_type: metadata.agent_type,
            status: if self.is_running() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Stopped
            },
            capabilities: metadata.capabilities.clone(),
        }
    }
}
