//! Game API server for the Tapgrid reaction game.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Game endpoints** (`/grid`, `/click`, `/status`) for polling the
//!   grid and resolving clicks against the authoritative session
//! - **Control endpoints** (`/start`, `/stop`, `/speed`) for the game's
//!   phase and tick speed
//! - **`WebSocket` endpoint** (`/ws/grid`) streaming every grid change
//!   via [`tokio::sync::broadcast`]
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! Handlers hold an [`AppState`] wrapping a
//! [`GameEngine`](tapgrid_core::GameEngine). All mutations go through the
//! engine's lock, so HTTP requests and scheduled ticks never interleave
//! inside a single operation.

pub mod control;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve};
pub use startup::{SpawnedServer, StartupError, spawn_server};
pub use state::AppState;
