//! Game engine binary for Tapgrid.
//!
//! This is the main entry point that wires together configuration,
//! structured logging, the authoritative game engine, and the HTTP +
//! `WebSocket` server. It runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tapgrid-config.yaml` (or `TAPGRID_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the game session and engine
//! 4. Spawn the game server
//! 5. Wait for `Ctrl-C`
//! 6. Disarm the tick task and stop the server

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tapgrid_core::config::{LogFormat, LoggingConfig};
use tapgrid_core::{GameConfig, GameEngine};
use tapgrid_server::{AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file looked up in the working directory when `TAPGRID_CONFIG`
/// is unset.
const DEFAULT_CONFIG_FILE: &str = "tapgrid-config.yaml";

/// Where the configuration came from, logged once tracing is up.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    File(PathBuf),
    Defaults(PathBuf),
}

/// Application entry point for the game engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let path = config_path(|key| std::env::var(key).ok());
    let (config, source) = load_config(&path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("tapgrid-engine starting");
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
        ConfigSource::Defaults(path) => {
            info!(path = %path.display(), "Config file not found, using defaults");
        }
    }
    info!(
        targets = config.grid.target_count,
        columns = config.grid.columns,
        danger_rows = config.grid.danger_rows,
        danger_policy = ?config.scoring.danger_policy,
        initial_speed = %config.speed.initial,
        "Game configuration"
    );

    // 3. Build the engine.
    let engine = GameEngine::from_config(&config).map_err(EngineError::from)?;
    info!("Game engine initialized");

    // 4. Start the game server.
    let state = Arc::new(AppState::new(engine.clone()));
    let server = tapgrid_server::spawn_server(&ServerConfig::from(&config.server), state)
        .await
        .map_err(EngineError::from)?;
    info!(addr = %server.addr, "Game server started");

    // 5. Wait for shutdown.
    tokio::signal::ctrl_c()
        .await
        .map_err(|source| EngineError::Signal { source })?;
    info!("Shutdown signal received");

    // 6. Stop ticking, then stop serving.
    engine.shutdown().await;
    server.handle.abort();
    info!("tapgrid-engine stopped");

    Ok(())
}

/// Resolve the config file path: `TAPGRID_CONFIG` if set, otherwise
/// `tapgrid-config.yaml` in the working directory.
fn config_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("TAPGRID_CONFIG")
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

/// Load configuration from `path`.
///
/// A missing file yields the defaults. Environment overrides and
/// validation apply in both cases.
fn load_config(path: &Path) -> Result<(GameConfig, ConfigSource), EngineError> {
    if path.exists() {
        let config = GameConfig::from_file(path)?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    } else {
        let config = GameConfig::parse("")?;
        Ok((config, ConfigSource::Defaults(path.to_path_buf())))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level is used.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
