//! Choreboard -- household chore tracker server.
//!
//! An axum HTTP server over a YAML-backed document store. Rooms, tasks,
//! and members are managed through a JSON API; due-ness is recomputed on
//! every read from each task's recurrence and last completion.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8080 with ./chores.yaml
//! cargo run --bin choreboard-server
//!
//! # Run on custom address with a custom data file
//! cargo run --bin choreboard-server -- --bind 127.0.0.1:3000 --data-file /tmp/chores.yaml
//!
//! # Or via environment variables
//! CHOREBOARD_ADDR=127.0.0.1:3000 cargo run --bin choreboard-server
//! ```

use std::sync::Arc;

use choreboard_server::api;
use choreboard_server::config::{CliArgs, ServerConfig};
use choreboard_server::store::{AppState, YamlFileStore};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, data_file = %config.data_file.display(), "starting choreboard server");

    let store = YamlFileStore::new(config.data_file);
    let state = Arc::new(AppState::new(store));

    match api::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "choreboard server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
