//! Configuration loading and typed config structures for Tapgrid.
//!
//! The canonical configuration lives in `tapgrid-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates
//! the file. Every field has a default, so an empty file reproduces the
//! reference game: 20 targets in 2 rows of 10, a 2-row danger band,
//! +10/-10 scoring, and 1000/500/250ms speed levels.

use std::path::Path;

use serde::Deserialize;
use tapgrid_types::{DangerPolicy, SpeedLevel};

use crate::grid::OffsetRange;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an unplayable game.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `tapgrid-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Network listener for the game API.
    #[serde(default)]
    pub server: ListenConfig,

    /// Grid shape and target placement.
    #[serde(default)]
    pub grid: GridConfig,

    /// Click rewards and penalties.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Speed levels and the level active at startup.
    #[serde(default)]
    pub speed: SpeedConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TAPGRID_HOST` overrides `server.host`
    /// - `TAPGRID_PORT` overrides `server.port`
    /// - `TAPGRID_SPEED` overrides `speed.initial`
    ///
    /// The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override or value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, apply environment
    /// overrides, and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override cannot be parsed.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TAPGRID_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TAPGRID_PORT") {
            self.server.port = port.trim().parse().map_err(|e| ConfigError::Invalid {
                reason: format!("TAPGRID_PORT={port}: {e}"),
            })?;
        }
        if let Some(speed) = lookup("TAPGRID_SPEED") {
            self.speed.initial =
                SpeedLevel::from_name(&speed).ok_or_else(|| ConfigError::Invalid {
                    reason: format!("TAPGRID_SPEED={speed}: expected low, medium, or high"),
                })?;
        }
        Ok(())
    }

    /// Check that the configuration describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };

        if self.grid.target_count == 0 {
            return invalid("grid.target_count must be at least 1");
        }
        if self.grid.columns == 0 {
            return invalid("grid.columns must be at least 1");
        }
        if self.grid.top_offset.min > self.grid.top_offset.max {
            return invalid("grid.top_offset.min must not exceed grid.top_offset.max");
        }
        if self.grid.left_offset.min > self.grid.left_offset.max {
            return invalid("grid.left_offset.min must not exceed grid.left_offset.max");
        }
        if self.scoring.target_reward <= 0 {
            return invalid("scoring.target_reward must be positive");
        }
        if self.scoring.danger_penalty <= 0 {
            return invalid("scoring.danger_penalty must be positive");
        }
        if self.speed.low_ms == 0 || self.speed.medium_ms == 0 || self.speed.high_ms == 0 {
            return invalid("speed intervals must be at least 1ms");
        }
        Ok(())
    }
}

/// Network listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListenConfig {
    /// Address to bind (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port for the game API.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Grid shape and target placement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Target cells generated per tick.
    #[serde(default = "default_target_count")]
    pub target_count: u32,

    /// Cells per row.
    #[serde(default = "default_columns")]
    pub columns: u32,

    /// Rows in the danger band below the targets.
    #[serde(default = "default_danger_rows")]
    pub danger_rows: u32,

    /// Vertical display offset range.
    #[serde(default = "default_top_offset")]
    pub top_offset: OffsetRange,

    /// Horizontal display offset range.
    #[serde(default = "default_left_offset")]
    pub left_offset: OffsetRange,

    /// Fixed RNG seed for reproducible offsets. Unset draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            columns: default_columns(),
            danger_rows: default_danger_rows(),
            top_offset: default_top_offset(),
            left_offset: default_left_offset(),
            seed: None,
        }
    }
}

/// Click rewards and penalties.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringConfig {
    /// Points added for a target click.
    #[serde(default = "default_points")]
    pub target_reward: i64,

    /// Points removed for a danger click.
    #[serde(default = "default_points")]
    pub danger_penalty: i64,

    /// Whether danger clicks touch the authoritative score.
    #[serde(default)]
    pub danger_policy: DangerPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            target_reward: default_points(),
            danger_penalty: default_points(),
            danger_policy: DangerPolicy::default(),
        }
    }
}

/// Speed level table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpeedConfig {
    /// Level active when the engine starts.
    #[serde(default)]
    pub initial: SpeedLevel,

    /// Tick interval for [`SpeedLevel::Low`].
    #[serde(default = "default_low_ms")]
    pub low_ms: u64,

    /// Tick interval for [`SpeedLevel::Medium`].
    #[serde(default = "default_medium_ms")]
    pub medium_ms: u64,

    /// Tick interval for [`SpeedLevel::High`].
    #[serde(default = "default_high_ms")]
    pub high_ms: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial: SpeedLevel::default(),
            low_ms: default_low_ms(),
            medium_ms: default_medium_ms(),
            high_ms: default_high_ms(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines with targets.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    3211
}

const fn default_target_count() -> u32 {
    20
}

const fn default_columns() -> u32 {
    10
}

const fn default_danger_rows() -> u32 {
    2
}

const fn default_top_offset() -> OffsetRange {
    OffsetRange {
        min: 0,
        max: 90,
        padding: 10,
    }
}

const fn default_left_offset() -> OffsetRange {
    OffsetRange {
        min: 0,
        max: 80,
        padding: 10,
    }
}

const fn default_points() -> i64 {
    10
}

const fn default_low_ms() -> u64 {
    1000
}

const fn default_medium_ms() -> u64 {
    500
}

const fn default_high_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_owned()
}
