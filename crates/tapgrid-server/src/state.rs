//! Shared application state for the game API server.
//!
//! [`AppState`] wraps the [`GameEngine`] handle that every handler
//! drives. The engine owns the authoritative session and the snapshot
//! broadcast channel, so the state itself is a thin, cloneable shell.

use tapgrid_core::GameEngine;
use tapgrid_types::GridSnapshot;
use tokio::sync::broadcast;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the running game.
    pub engine: GameEngine,
}

impl AppState {
    /// Create application state around an engine handle.
    pub const fn new(engine: GameEngine) -> Self {
        Self { engine }
    }

    /// Subscribe to grid snapshots.
    ///
    /// Returns a receiver that yields a [`GridSnapshot`] for every grid
    /// change the engine publishes.
    pub fn subscribe(&self) -> broadcast::Receiver<GridSnapshot> {
        self.engine.subscribe()
    }
}
