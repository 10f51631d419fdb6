//! CLI commands for minihive using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::config::load_settings_or_default;
use crate::orchestrator::Orchestrator;
use crate::protocol::{Message, MessageBuilder, MessageType};

/// Sender id stamped on messages built by the CLI.
const CLI_SENDER_ID: &str = "cli";

/// minihive - in-process multi-agent orchestration.
#[derive(Parser)]
#[command(name = "minihive")]
#[command(version = "0.1.0")]
#[command(about = "In-process multi-agent orchestration substrate", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Dispatch a task request and print the response
    Dispatch {
        /// JSON payload, e.g. '{"task_type":"echo","data":{"value":42}}'
        payload: String,

        /// Route to a specific agent id instead of the coordinator
        #[arg(long)]
        recipient: Option<String>,

        /// Override the configured dispatch timeout (seconds)
        #[arg(long)]
        timeout: Option<f64>,
    },

    /// Probe the coordinator's health
    Health,

    /// List the default agents and their health
    Agents,
}

impl Commands {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Command::Dispatch {
                payload,
                recipient,
                timeout,
            } => dispatch(payload, recipient.as_deref(), *timeout).await,
            Command::Health => health().await,
            Command::Agents => agents().await,
        }
    }
}

async fn dispatch(payload: &str, recipient: Option<&str>, timeout: Option<f64>) -> Result<()> {
    let payload: Value = serde_json::from_str(payload)?;
    let mut settings = load_settings_or_default();
    if let Some(seconds) = timeout {
        if seconds <= 0.0 {
            anyhow::bail!("timeout must be positive");
        }
        settings.dispatch_timeout_seconds = seconds;
    }

    let orchestrator = Orchestrator::new(settings);
    orchestrator.setup().await?;

    let mut builder = MessageBuilder::new(CLI_SENDER_ID, MessageType::TaskRequest).payload(payload);
    if let Some(recipient) = recipient {
        builder = builder.recipient(recipient);
    }
    let message = builder.build()?;

    let response = orchestrator.dispatch(&message).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    orchestrator.teardown().await;
    Ok(())
}

async fn health() -> Result<()> {
    let orchestrator = Orchestrator::new(load_settings_or_default());
    orchestrator.setup().await?;

    let message = Message::health_check(CLI_SENDER_ID);
    let response = orchestrator.dispatch(&message).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    orchestrator.teardown().await;
    Ok(())
}

async fn agents() -> Result<()> {
    let orchestrator = Orchestrator::new(load_settings_or_default());
    orchestrator.setup().await?;

    let mut rows = Vec::new();
    for summary in orchestrator.registry().list_agents().await {
        if let Some(agent) = orchestrator.registry().get(&summary.agent_id).await {
            rows.push(serde_json::to_value(agent.health_check())?);
        }
    }
    println!("{}", serde_json::to_string_pretty(&json!({ "agents": rows }))?);

    orchestrator.teardown().await;
    Ok(())
}
