//! Error types for the game core.
//!
//! Clicks never fail: an out-of-zone click or a click outside the
//! Running phase resolves to a zero delta instead. The only rejected
//! inputs are unknown speed levels and unplayable configurations.

use crate::config::ConfigError;

/// Errors surfaced by [`GameSession`](crate::session::GameSession) and
/// [`GameEngine`](crate::engine::GameEngine).
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A speed change named a level that does not exist. The previous
    /// setting is kept.
    #[error("unknown speed level '{0}' (expected low, medium, or high)")]
    InvalidSpeedLevel(String),

    /// The session could not be built from its configuration.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },
}
