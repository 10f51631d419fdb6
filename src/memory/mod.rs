//! Agent-facing key/value storage.
//!
//! Agents only depend on the [`Memory`] contract; the bundled
//! [`ShortTermMemory`] is the in-process implementation. Persistent and
//! similarity-search backends live outside this crate and implement the
//! same surface.

pub mod short_term;

pub use short_term::ShortTermMemory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Storage contract consumed by agents.
#[async_trait]
pub trait Memory: Send + Sync {
    /// Persist a key/value pair.
    async fn store(&self, key: &str, value: Value) -> Result<()>;

    /// Retrieve a value by key, `None` when absent.
    async fn retrieve(&self, key: &str) -> Result<Option<Value>>;

    /// Delete a key. Absent keys are a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Wipe all stored entries.
    async fn clear(&self) -> Result<()>;

    /// Whether a key is present.
    async fn exists(&self, key: &str) -> Result<bool>;
}
