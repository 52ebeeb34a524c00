//! Server binary for the `OneHeart` impact backend.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `oneheart-config.yaml` (or defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Open the configured store, migrate, and optionally seed
//! 4. Serve the HTTP API until `Ctrl-C`

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use oneheart_api::AppState;
use oneheart_core::ServiceConfig;
use oneheart_core::config::LoggingConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "oneheart-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, store startup, or serving fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_logging(&config.logging);

    info!(
        host = %config.server.host,
        port = config.server.port,
        backend = ?config.database.backend,
        history_days = config.impact.history_days,
        "oneheart-server starting"
    );

    let store = oneheart_api::open_store(&config.database)
        .await
        .map_err(AppError::from)?;

    let state = Arc::new(
        AppState::new(store.clone()).with_history_days(config.impact.history_days),
    );

    let served = oneheart_api::start_server(
        &config.server.host,
        config.server.port,
        state,
        shutdown_signal(),
    )
    .await;
    store.close().await;
    served.map_err(AppError::from)?;

    info!("oneheart-server exited cleanly");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `ONEHEART_CONFIG` or `oneheart-config.yaml`.
///
/// A missing file means defaults plus environment overrides.
fn load_config() -> Result<ServiceConfig, AppError> {
    let path = std::env::var("ONEHEART_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(ServiceConfig::from_file(&path)?)
    } else {
        let mut config = ServiceConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Resolve when the process receives `Ctrl-C`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
