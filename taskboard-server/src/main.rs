//! Taskboard server: HTTP CRUD and filtering over a task document store.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:3000, tasks kept in memory
//! cargo run --bin taskboard-server
//!
//! # Persist tasks to a snapshot file
//! cargo run --bin taskboard-server -- --data-file tasks.db
//!
//! # Or via environment variables
//! TASKBOARD_ADDR=127.0.0.1:8080 TASKBOARD_LOG=debug cargo run --bin taskboard-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::routes::{self, AppState};
use taskboard_server::store::MemoryStore;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = match &config.data_file {
        Some(path) => match MemoryStore::open(path.clone()).await {
            Ok(store) => {
                tracing::info!(
                    path = %path.display(),
                    tasks = store.len().await,
                    "loaded task snapshot"
                );
                store
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to open task store");
                std::process::exit(1);
            }
        },
        None => MemoryStore::new(),
    };

    tracing::info!(addr = %config.bind_addr, "starting taskboard server");

    match routes::start_server_with_state(&config.bind_addr, Arc::new(AppState::new(store))).await
    {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskboard server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start taskboard server");
            std::process::exit(1);
        }
    }
}
