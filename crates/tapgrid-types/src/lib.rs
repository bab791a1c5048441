//! Shared type definitions for the Tapgrid reaction game.
//!
//! This crate is the single source of truth for the payloads exchanged
//! between the game engine and its clients. Types defined here flow
//! downstream to `TypeScript` via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for game identifiers
//! - [`enums`] -- Cell kinds, session phase, speed levels, danger policy
//! - [`structs`] -- Grid cells, snapshots, click outcomes, session status

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CellKind, DangerPolicy, Phase, SpeedLevel};
pub use ids::GameId;
pub use structs::{
    CellOffset, ClickOutcome, GameStatus, GridCell, GridLayout, GridSnapshot, HighlightHint,
};
