//! Message and response envelopes exchanged between agents.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;

/// Default time-to-live for a message, in seconds.
pub const DEFAULT_TTL_SECONDS: u64 = 60;

/// Agent id reported when the dispatcher itself produces a failure.
pub const PROTOCOL_AGENT_ID: &str = "protocol";

/// Message type classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Request to execute a unit of work
    TaskRequest,
    /// Result of an executed unit of work
    TaskResponse,
    /// Liveness probe
    HealthCheck,
    /// Lookup against an agent's private store
    MemoryQuery,
    /// Message with no specific recipient
    Broadcast,
    /// Error report
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::TaskRequest => "task_request",
            MessageType::TaskResponse => "task_response",
            MessageType::HealthCheck => "health_check",
            MessageType::MemoryQuery => "memory_query",
            MessageType::Broadcast => "broadcast",
            MessageType::Error => "error",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Envelope for all inter-agent communication.
///
/// Immutable once constructed. An absent `recipient_id` routes the message
/// to the first registered coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID (UUID v4)
    pub message_id: String,
    /// Sender agent ID
    pub sender_id: String,
    /// Recipient agent ID (None for coordinator routing)
    pub recipient_id: Option<String>,
    /// Message type
    pub message_type: MessageType,
    /// Attached data
    pub payload: Option<Value>,
    /// Correlation ID for request/response chains
    pub correlation_id: Option<String>,
    /// Creation timestamp (unix ms)
    pub timestamp: i64,
    /// Advisory time-to-live in seconds (>= 1)
    pub ttl_seconds: u64,
}

impl Message {
    /// Create a task request routed to the coordinator.
    pub fn task_request(sender_id: impl Into<String>, payload: Value) -> Self {
        Self::with_type(sender_id, MessageType::TaskRequest, Some(payload))
    }

    /// Create a health check probe.
    pub fn health_check(sender_id: impl Into<String>) -> Self {
        Self::with_type(sender_id, MessageType::HealthCheck, None)
    }

    /// Create a memory query for a stored key.
    pub fn memory_query(sender_id: impl Into<String>, key: impl Into<String>) -> Self {
        let payload = serde_json::json!({ "key": key.into() });
        Self::with_type(sender_id, MessageType::MemoryQuery, Some(payload))
    }

    fn with_type(
        sender_id: impl Into<String>,
        message_type: MessageType,
        payload: Option<Value>,
    ) -> Self {
        Self {
            message_id: generate_id(),
            sender_id: sender_id.into(),
            recipient_id: None,
            message_type,
            payload,
            correlation_id: None,
            timestamp: current_timestamp(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Address the message to a specific agent.
    pub fn with_recipient(mut self, recipient_id: impl Into<String>) -> Self {
        self.recipient_id = Some(recipient_id.into());
        self
    }

    /// Set the correlation ID for request/response tracking.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

/// Builder for messages that need full control over optional fields.
pub struct MessageBuilder {
    sender_id: String,
    recipient_id: Option<String>,
    message_type: MessageType,
    payload: Option<Value>,
    correlation_id: Option<String>,
    ttl_seconds: u64,
}

impl MessageBuilder {
    pub fn new(sender_id: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            sender_id: sender_id.into(),
            recipient_id: None,
            message_type,
            payload: None,
            correlation_id: None,
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Address to a specific agent.
    pub fn recipient(mut self, agent_id: impl Into<String>) -> Self {
        self.recipient_id = Some(agent_id.into());
        self
    }

    /// Attach a payload.
    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Set the correlation ID.
    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Set the time-to-live in seconds.
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    /// Build the message, validating cross-field constraints.
    pub fn build(self) -> Result<Message, Error> {
        if self.sender_id.is_empty() {
            return Err(Error::Validation("sender_id must not be empty".to_string()));
        }
        if self.ttl_seconds < 1 {
            return Err(Error::Validation(
                "ttl_seconds must be at least 1".to_string(),
            ));
        }

        Ok(Message {
            message_id: generate_id(),
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            message_type: self.message_type,
            payload: self.payload,
            correlation_id: self.correlation_id,
            timestamp: current_timestamp(),
            ttl_seconds: self.ttl_seconds,
        })
    }
}

/// Standardised response envelope returned by every agent handler.
///
/// `error` is only meaningful when `success` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// ID of the agent that produced the response
    pub agent_id: String,
    /// Echoes the originating message ID
    pub message_id: String,
    /// Whether handling succeeded
    pub success: bool,
    /// Result data on success
    pub payload: Option<Value>,
    /// Failure description when success is false
    pub error: Option<String>,
    /// Creation timestamp (unix ms)
    pub timestamp: i64,
}

impl Response {
    /// Create a successful response to a message.
    pub fn ok(agent_id: impl Into<String>, message: &Message, payload: Value) -> Self {
        Self {
            agent_id: agent_id.into(),
            message_id: message.message_id.clone(),
            success: true,
            payload: Some(payload),
            error: None,
            timestamp: current_timestamp(),
        }
    }

    /// Create a failed response to a message.
    pub fn fail(agent_id: impl Into<String>, message: &Message, error: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            message_id: message.message_id.clone(),
            success: false,
            payload: None,
            error: Some(error.into()),
            timestamp: current_timestamp(),
        }
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}
