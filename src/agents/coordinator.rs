//! Coordinator agent: routes task requests to registered task agents.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::agent::{Agent, AgentMetadata, AgentType};
use super::registry::AgentRegistry;
use crate::error::Result;
use crate::protocol::{Message, MessageType, Response};

/// Receives orchestration messages and delegates task requests to the first
/// registered task agent.
///
/// First-registered-wins is the routing policy; balancing across several
/// task agents is an extension point, not implemented here.
pub struct CoordinatorAgent {
    metadata: AgentMetadata,
    registry: Arc<AgentRegistry>,
    running: AtomicBool,
}

impl CoordinatorAgent {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self {
            metadata: AgentMetadata::new(
                AgentType::Coordinator,
                &["route", "delegate", "aggregate"],
            ),
            registry,
            running: AtomicBool::new(false),
        }
    }

    async fn delegate_task(&self, message: &Message) -> Result<Response> {
        let candidates = self.registry.get_by_type(AgentType::Task).await;
        let target = match candidates.first() {
            Some(agent) => agent,
            None => {
                return Ok(Response::fail(
                    self.agent_id(),
                    message,
                    "No TaskAgents available.",
                ));
            }
        };

        tracing::info!(
            "Coordinator {} delegating message {} to task agent {}",
            self.agent_id(),
            message.message_id,
            target.agent_id()
        );
        // Forward verbatim; the task agent's response flows back unmodified.
        target.handle(message).await
    }
}

#[async_trait]
impl Agent for CoordinatorAgent {
    fn metadata(&self) -> &AgentMetadata {
        &self.metadata
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn startup(&self) {
        self.running.store(true, Ordering::SeqCst);
        tracing::info!("Coordinator {} started", self.agent_id());
    }

    async fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Coordinator {} stopped", self.agent_id());
    }

    async fn handle(&self, message: &Message) -> Result<Response> {
        match message.message_type {
            MessageType::TaskRequest => self.delegate_task(message).await,
            MessageType::HealthCheck => Ok(Response::ok(
                self.agent_id(),
                message,
                json!({
                    "status": "ok",
                    "registered_agents": self.registry.count().await,
                }),
            )),
            other => Ok(Response::fail(
                self.agent_id(),
                message,
                format!("Unsupported message type: {}", other),
            )),
        }
    }
}
