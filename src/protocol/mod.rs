//! Agent-to-agent protocol: message envelopes and the dispatcher.

pub mod dispatch;
pub mod message;

pub use dispatch::{ProtocolDispatcher, DEFAULT_TIMEOUT};
pub use message::{Message, MessageBuilder, MessageType, Response, PROTOCOL_AGENT_ID};
