//! Bounded in-process store with least-recently-used eviction.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::Memory;
use crate::error::Result;

/// Default capacity when none is configured.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Fast within-session memory, private to the agent that owns it.
///
/// Every operation takes the inner lock once and mutates synchronously, so
/// a caller cancelled at the await boundary leaves no partial entry behind.
pub struct ShortTermMemory {
    inner: Mutex<Inner>,
    capacity: usize,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Value>,
    /// Keys ordered least- to most-recently used.
    order: VecDeque<String>,
}

impl ShortTermMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ShortTermMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Inner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.to_string());
    }
}

#[async_trait]
impl Memory for ShortTermMemory {
    async fn store(&self, key: &str, value: Value) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.touch(key);
        inner.entries.insert(key.to_string(), value);

        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Value>> {
        let mut inner = self.inner.lock().await;
        let value = inner.entries.get(key).cloned();
        if value.is_some() {
            inner.touch(key);
        }
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.entries.remove(key);
        if let Some(pos) = inner.order.iter().position(|k| k == key) {
            inner.order.remove(pos);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.order.clear();
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.inner.lock().await.entries.contains_key(key))
    }
}
