//! minihive - in-process multi-agent orchestration substrate.

use clap::Parser;
use std::process::ExitCode;

mod agents;
mod cli;
mod config;
mod error;
mod logging;
mod memory;
mod orchestrator;
mod protocol;

use cli::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    let _guard = match logging::init() {
        Ok((guard, _log_dir)) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args = Commands::parse();

    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
