//! Composition root: wires the registry, dispatcher, and default agents.

use std::sync::Arc;
use std::time::Duration;

use crate::agents::{AgentRegistry, CoordinatorAgent, TaskAgent};
use crate::config::Settings;
use crate::error::Result;
use crate::protocol::{Message, ProtocolDispatcher, Response};

/// Owns one registry and one dispatcher, and is the only component that
/// constructs them. Holds no other mutable state and performs no business
/// logic.
pub struct Orchestrator {
    settings: Settings,
    registry: Arc<AgentRegistry>,
    dispatcher: ProtocolDispatcher,
}

impl Orchestrator {
    pub fn new(settings: Settings) -> Self {
        let registry = Arc::new(AgentRegistry::new());
        let dispatcher = ProtocolDispatcher::new(registry.clone());
        Self {
            settings,
            registry,
            dispatcher,
        }
    }

    /// The registry, for callers that manage additional agents.
    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Construct and register the default coordinator and task agents,
    /// in that order.
    pub async fn setup(&self) -> Result<()> {
        let coordinator = Arc::new(CoordinatorAgent::new(self.registry.clone()));
        let task_agent = Arc::new(TaskAgent::with_capacity(self.settings.short_term_capacity));

        self.registry.register(coordinator).await?;
        self.registry.register(task_agent).await?;

        tracing::info!(
            "Orchestrator setup complete ({} agents registered)",
            self.registry.count().await
        );
        Ok(())
    }

    /// Shut down and release every registered agent.
    pub async fn teardown(&self) {
        self.registry.shutdown_all().await;
        tracing::info!("Orchestrator teardown complete");
    }

    /// Dispatch a message using the configured timeout.
    pub async fn dispatch(&self, message: &Message) -> Response {
        let timeout = Duration::from_secs_f64(self.settings.dispatch_timeout_seconds);
        self.dispatcher.dispatch(message, timeout).await
    }
}
