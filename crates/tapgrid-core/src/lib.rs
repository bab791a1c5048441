//! Game session, grid generation, scoring, and tick scheduling for Tapgrid.
//!
//! This crate owns the authoritative game state. A session moves through
//! Idle, Running and Ended; while Running a scheduler task regenerates
//! the grid every tick interval, and clicks are resolved against the
//! current grid to update the score.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `tapgrid-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`GameEngine`], the lock-guarded shared handle that
//!   arms the tick task and broadcasts grid snapshots.
//! - [`error`] -- [`GameError`].
//! - [`grid`] -- Target generation and click classification.
//! - [`scheduler`] -- Cancellable periodic tick task.
//! - [`scoring`] -- Click resolution into score decisions.
//! - [`session`] -- The synchronous [`GameSession`] state machine.
//! - [`speed`] -- Speed levels and their tick intervals.
//!
//! [`GameEngine`]: engine::GameEngine
//! [`GameError`]: error::GameError
//! [`GameSession`]: session::GameSession

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod speed;

pub use config::{ConfigError, GameConfig};
pub use engine::GameEngine;
pub use error::GameError;
pub use session::{GameSession, SpeedChange, StartOutcome};
