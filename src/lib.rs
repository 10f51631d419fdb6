//! minihive library root.

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod memory;
pub mod orchestrator;
pub mod protocol;

pub use agents::{
    Agent, AgentMetadata, AgentRegistry, AgentType, CoordinatorAgent, HealthReport, HealthStatus,
    TaskAgent,
};
pub use config::{load_settings, load_settings_or_default, Settings};
pub use error::{Error, Result};
pub use memory::{Memory, ShortTermMemory};
pub use orchestrator::Orchestrator;
pub use protocol::{Message, MessageBuilder, MessageType, ProtocolDispatcher, Response};
