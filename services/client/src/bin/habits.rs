//! services/client/src/bin/habits.rs
//!
//! Command-line front end over the session manager and gateway client.

use chrono::Local;
use clap::Parser;
use client_lib::cli::{self, Cli, Console};
use client_lib::{config::Config, error::ClientError, AppState};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode, ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- 2. Build the Application Root ---
    let state = AppState::from_config(config);
    info!("Using backend at {}", state.gateway.base_url());

    // --- 3. Restore the Session & Dispatch ---
    let mut console = Console {
        out: std::io::stdout(),
        err: std::io::stderr(),
    };
    let exit = cli::run(cli.command, &state, Local::now().date_naive(), &mut console).await?;
    Ok(exit.into())
}
