//! Protocol dispatcher: target resolution, deadlines, failure containment.

use std::sync::Arc;
use std::time::Duration;

use super::message::{Message, Response, PROTOCOL_AGENT_ID};
use crate::agents::{Agent, AgentRegistry, AgentType};

/// Default handler deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Routes messages to agents through the registry, bounding every handler
/// invocation with a deadline.
///
/// This is the failure-containment boundary: a missing target, a timeout,
/// or a handler fault all come back as a plain failed [`Response`] carrying
/// the `"protocol"` agent id. Nothing downstream of `dispatch` surfaces as
/// an error to the caller.
pub struct ProtocolDispatcher {
    registry: Arc<AgentRegistry>,
}

impl ProtocolDispatcher {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatch a message to its target agent, bounded by `timeout`.
    ///
    /// When the deadline fires the in-flight handler future is dropped and
    /// its eventual result discarded; there is no retry.
    pub async fn dispatch(&self, message: &Message, timeout: Duration) -> Response {
        let target = match self.resolve_target(message).await {
            Some(agent) => agent,
            None => {
                let recipient = message.recipient_id.as_deref().unwrap_or("");
                tracing::warn!(
                    message_id = %message.message_id,
                    sender_id = %message.sender_id,
                    "No agent found for recipient '{}'",
                    recipient
                );
                return Response::fail(
                    PROTOCOL_AGENT_ID,
                    message,
                    format!("No agent found for recipient '{}'", recipient),
                );
            }
        };

        tracing::info!(
            message_id = %message.message_id,
            sender_id = %message.sender_id,
            recipient_id = message.recipient_id.as_deref().unwrap_or(""),
            message_type = %message.message_type,
            "Dispatching message"
        );

        match tokio::time::timeout(timeout, target.handle(message)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(
                    message_id = %message.message_id,
                    message_type = %message.message_type,
                    "Handler failed: {}",
                    e
                );
                Response::fail(PROTOCOL_AGENT_ID, message, e.to_string())
            }
            Err(_) => {
                let seconds = timeout.as_secs_f64();
                tracing::error!(
                    message_id = %message.message_id,
                    message_type = %message.message_type,
                    "Agent timed out after {}s",
                    seconds
                );
                Response::fail(
                    PROTOCOL_AGENT_ID,
                    message,
                    format!("Agent timed out after {}s", seconds),
                )
            }
        }
    }

    async fn resolve_target(&self, message: &Message) -> Option<Arc<dyn Agent>> {
        if let Some(recipient_id) = &message.recipient_id {
            return self.registry.get(recipient_id).await;
        }
        // No recipient: route to the first registered coordinator.
        self.registry
            .get_by_type(AgentType::Coordinator)
            .await
            .into_iter()
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::agent::AgentMetadata;
    use crate::agents::{CoordinatorAgent, TaskAgent};
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct SlowAgent {
        metadata: AgentMetadata,
        running: AtomicBool,
        delay: Duration,
    }

    impl SlowAgent {
        fn new(delay: Duration) -> Self {
            Self {
                metadata: AgentMetadata::new(AgentType::Task, &["execute"]),
                running: AtomicBool::new(false),
                delay,
            }
        }
    }

    #[async_trait]
    impl Agent for SlowAgent {
        fn metadata(&self) -> &AgentMetadata {
            &self.metadata
        }

        fn is_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }

        async fn startup(&self) {
            self.running.store(true, Ordering::SeqCst);
        }

        async fn shutdown(&self) {
            self.running.store(false, Ordering::SeqCst);
        }

        async fn handle(&self, message: &Message) -> Result<Response> {
            tokio::time::sleep(self.delay).await;
            Ok(Response::ok(self.agent_id(), message, json!({})))
        }
    }

    struct FailingAgent {
        metadata: AgentMetadata,
        running: AtomicBool,
    }

    impl FailingAgent {
        fn new() -> Self {
            Self {
                metadata: AgentMetadata::new(AgentType::Task, &["execute"]),
                running: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl Agent for FailingAgent {
        fn metadata(&self) -> &AgentMetadata {
            &self.metadata
        }

        fn is_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }

        async fn startup(&self) {
            self.running.store(true, Ordering::SeqCst);
        }

        async fn shutdown(&self) {
            self.running.store(false, Ordering::SeqCst);
        }

        async fn handle(&self, _message: &Message) -> Result<Response> {
            Err(Error::Agent("task blew up".to_string()))
        }
    }

    #[tokio::test]
    async fn test_unresolved_recipient() {
        let registry = Arc::new(AgentRegistry::new());
        let dispatcher = ProtocolDispatcher::new(registry);

        let message = Message::task_request("test", json!({})).with_recipient("nonexistent-id");
        let response = dispatcher.dispatch(&message, DEFAULT_TIMEOUT).await;

        assert!(!response.success);
        assert_eq!(response.agent_id, "protocol");
        assert!(response
            .error
            .as_deref()
            .unwrap()
            .contains("No agent found for recipient 'nonexistent-id'"));
    }

    #[tokio::test]
    async fn test_no_coordinator_registered() {
        let registry = Arc::new(AgentRegistry::new());
        registry.register(Arc::new(TaskAgent::new())).await.unwrap();
        let dispatcher = ProtocolDispatcher::new(registry);

        // No recipient and no coordinator to fall back to.
        let message = Message::task_request("test", json!({}));
        let response = dispatcher.dispatch(&message, DEFAULT_TIMEOUT).await;

        assert!(!response.success);
        assert!(response.error.as_deref().unwrap().contains("No agent found"));
    }

    #[tokio::test]
    async fn test_routes_to_coordinator_when_no_recipient() {
        let registry = Arc::new(AgentRegistry::new());
        let coordinator = Arc::new(CoordinatorAgent::new(registry.clone()));
        let coordinator_id = coordinator.agent_id().to_string();
        registry.register(coordinator).await.unwrap();
        let dispatcher = ProtocolDispatcher::new(registry);

        let message = Message::health_check("test");
        let response = dispatcher.dispatch(&message, DEFAULT_TIMEOUT).await;

        assert!(response.success);
        assert_eq!(response.agent_id, coordinator_id);
    }

    #[tokio::test]
    async fn test_timeout_produces_protocol_failure() {
        let registry = Arc::new(AgentRegistry::new());
        let slow: Arc<dyn Agent> = Arc::new(SlowAgent::new(Duration::from_secs(5)));
        let slow_id = slow.agent_id().to_string();
        registry.register(slow).await.unwrap();
        let dispatcher = ProtocolDispatcher::new(registry);

        let message = Message::task_request("test", json!({})).with_recipient(&slow_id);
        let started = std::time::Instant::now();
        let response = dispatcher
            .dispatch(&message, Duration::from_millis(50))
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!response.success);
        assert_eq!(response.agent_id, "protocol");
        assert!(response.error.as_deref().unwrap().contains("timed out"));
        assert_eq!(response.message_id, message.message_id);
    }

    #[tokio::test]
    async fn test_handler_fault_is_contained() {
        let registry = Arc::new(AgentRegistry::new());
        let failing: Arc<dyn Agent> = Arc::new(FailingAgent::new());
        let failing_id = failing.agent_id().to_string();
        registry.register(failing).await.unwrap();
        let dispatcher = ProtocolDispatcher::new(registry);

        let message = Message::task_request("test", json!({})).with_recipient(&failing_id);
        let response = dispatcher.dispatch(&message, DEFAULT_TIMEOUT).await;

        assert!(!response.success);
        assert_eq!(response.agent_id, "protocol");
        assert!(response.error.as_deref().unwrap().contains("task blew up"));
    }

    #[tokio::test]
    async fn test_success_passes_through_unmodified() {
        let registry = Arc::new(AgentRegistry::new());
        let task: Arc<dyn Agent> = Arc::new(TaskAgent::new());
        let task_id = task.agent_id().to_string();
        registry.register(task).await.unwrap();
        let dispatcher = ProtocolDispatcher::new(registry);

        let message = Message::task_request("test", json!({"task_type": "echo", "data": {}}))
            .with_recipient(&task_id);
        let response = dispatcher.dispatch(&message, DEFAULT_TIMEOUT).await;

        assert!(response.success);
        // The task agent's own id is preserved, not overwritten.
        assert_eq!(response.agent_id, task_id);
    }
}
