//! Speed levels and their tick intervals.

use std::time::Duration;

use tapgrid_types::SpeedLevel;

use crate::config::SpeedConfig;
use crate::error::GameError;

/// Maps each [`SpeedLevel`] to a tick interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTable {
    low: Duration,
    medium: Duration,
    high: Duration,
}

impl SpeedTable {
    /// Build the table from configuration.
    pub const fn new(config: &SpeedConfig) -> Self {
        Self {
            low: Duration::from_millis(config.low_ms),
            medium: Duration::from_millis(config.medium_ms),
            high: Duration::from_millis(config.high_ms),
        }
    }

    /// Tick interval for `level`.
    pub const fn interval(&self, level: SpeedLevel) -> Duration {
        match level {
            SpeedLevel::Low => self.low,
            SpeedLevel::Medium => self.medium,
            SpeedLevel::High => self.high,
        }
    }

    /// Tick interval for `level`, in whole milliseconds.
    pub fn interval_ms(&self, level: SpeedLevel) -> u64 {
        u64::try_from(self.interval(level).as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self::new(&SpeedConfig::default())
    }
}

/// Parse a speed level name received from a client.
///
/// # Errors
///
/// Returns [`GameError::InvalidSpeedLevel`] if `name` is not `low`,
/// `medium`, or `high` (case-insensitive).
pub fn parse_speed_level(name: &str) -> Result<SpeedLevel, GameError> {
    SpeedLevel::from_name(name).ok_or_else(|| GameError::InvalidSpeedLevel(name.to_owned()))
}
