//! Task agent: executes delegated work and keeps results in short-term memory.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::agent::{Agent, AgentMetadata, AgentType};
use crate::error::Result;
use crate::memory::short_term::DEFAULT_CAPACITY;
use crate::memory::{Memory, ShortTermMemory};
use crate::protocol::{Message, MessageType, Response};

/// General-purpose task executor.
///
/// Results are stored under `task:<message_id>` in a private short-term
/// store that nothing else touches; shutdown clears it.
pub struct TaskAgent {
    metadata: AgentMetadata,
    memory: ShortTermMemory,
    running: AtomicBool,
}

impl TaskAgent {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            metadata: AgentMetadata::new(AgentType::Task, &["execute", "store", "retrieve"]),
            memory: ShortTermMemory::new(capacity),
            running: AtomicBool::new(false),
        }
    }

    async fn execute_task(&self, message: &Message) -> Result<Response> {
        let payload = message.payload.clone().unwrap_or_else(|| json!({}));
        let task_type = payload
            .get("task_type")
            .and_then(Value::as_str)
            .unwrap_or("generic");
        let data = payload.get("data").cloned().unwrap_or_else(|| json!({}));

        let result = json!({
            "task_type": task_type,
            "processed": true,
            "input": data,
        });

        // Single insert after the work completes, so a dispatch cancelled
        // mid-handle leaves no partial entry.
        self.memory
            .store(&format!("task:{}", message.message_id), result.clone())
            .await?;

        Ok(Response::ok(self.agent_id(), message, result))
    }

    async fn memory_lookup(&self, message: &Message) -> Result<Response> {
        let key = message
            .payload
            .as_ref()
            .and_then(|p| p.get("key"))
            .and_then(Value::as_str);
        let value = match key {
            Some(k) => self.memory.retrieve(k).await?,
            None => None,
        };

        // An absent key is answered with a null value, not an error.
        Ok(Response::ok(
            self.agent_id(),
            message,
            json!({ "key": key, "value": value }),
        ))
    }
}

impl Default for TaskAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for TaskAgent {
    fn metadata(&self) -> &AgentMetadata {
        &self.metadata
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn startup(&self) {
        self.running.store(true, Ordering::SeqCst);
        tracing::info!("Task agent {} started", self.agent_id());
    }

    async fn shutdown(&self) {
        // Clear the private store before flipping the lifecycle flag.
        if let Err(e) = self.memory.clear().await {
            tracing::warn!("Failed to clear store for agent {}: {}", self.agent_id(), e);
        }
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Task agent {} stopped", self.agent_id());
    }

    async fn handle(&self, message: &Message) -> Result<Response> {
        match message.message_type {
            MessageType::TaskRequest => self.execute_task(message).await,
            MessageType::MemoryQuery => self.memory_lookup(message).await,
            other => Ok(Response::fail(
                self.agent_id(),
                message,
                format!("Unsupported message type: {}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_task_processes_payload() {
        let agent = TaskAgent::new();
        let message = Message::task_request(
            "test",
            json!({"task_type": "echo", "data": {"value": 42}}),
        );

        let response = agent.handle(&message).await.unwrap();

        assert!(response.success);
        assert_eq!(response.agent_id, agent.agent_id());
        assert_eq!(
            response.payload.unwrap(),
            json!({"task_type": "echo", "processed": true, "input": {"value": 42}})
        );
    }

    #[tokio::test]
    async fn test_result_stored_under_task_key() {
        let agent = TaskAgent::new();
        let message = Message::task_request("test", json!({"task_type": "echo", "data": {}}));

        agent.handle(&message).await.unwrap();

        let key = format!("task:{}", message.message_id);
        let stored = agent.memory.retrieve(&key).await.unwrap().unwrap();
        assert_eq!(stored["processed"], true);
    }

    #[tokio::test]
    async fn test_memory_query_round_trip() {
        let agent = TaskAgent::new();
        let request = Message::task_request("test", json!({"task_type": "echo", "data": {}}));
        agent.handle(&request).await.unwrap();

        let query = Message::memory_query("test", format!("task:{}", request.message_id));
        let response = agent.handle(&query).await.unwrap();

        assert!(response.success);
        let payload = response.payload.unwrap();
        assert_eq!(payload["value"]["task_type"], "echo");
    }

    #[tokio::test]
    async fn test_memory_query_missing_key_yields_null() {
        let agent = TaskAgent::new();

        let query = Message::memory_query("test", "task:nothing");
        let response = agent.handle(&query).await.unwrap();

        assert!(response.success);
        let payload = response.payload.unwrap();
        assert_eq!(payload["key"], "task:nothing");
        assert!(payload["value"].is_null());
    }

    #[tokio::test]
    async fn test_missing_payload_defaults_to_generic() {
        let agent = TaskAgent::new();
        let message = Message::task_request("test", json!({})).with_recipient(agent.agent_id());

        let response = agent.handle(&message).await.unwrap();

        let payload = response.payload.unwrap();
        assert_eq!(payload["task_type"], "generic");
        assert_eq!(payload["input"], json!({}));
    }

    #[tokio::test]
    async fn test_unsupported_message_type() {
        let agent = TaskAgent::new();

        let message = Message::health_check("test");
        let response = agent.handle(&message).await.unwrap();

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Unsupported message type: health_check")
        );
    }

    #[tokio::test]
    async fn test_shutdown_clears_store() {
        let agent = TaskAgent::new();
        let message = Message::task_request("test", json!({"task_type": "echo", "data": {}}));
        agent.handle(&message).await.unwrap();

        agent.shutdown().await;

        assert!(agent.memory.is_empty().await);
        assert!(!agent.is_running());
    }
}
