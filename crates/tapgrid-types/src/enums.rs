//! Enumeration types for the Tapgrid game model.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// What occupies a coordinate of the click space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CellKind {
    /// Nothing clickable. Clicks here score nothing.
    Empty,
    /// A live target that rewards the player.
    Target,
    /// Part of the danger band that penalizes the player.
    Danger,
}

// ---------------------------------------------------------------------------
// Session phase
// ---------------------------------------------------------------------------

/// Run state of a game session.
///
/// ```text
/// Idle --start--> Running --stop--> Ended --start--> Running
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// No game has been started yet.
    Idle,
    /// Targets are live and the tick timer is armed.
    Running,
    /// The game was stopped; the score is frozen as the final score.
    Ended,
}

impl Phase {
    /// Whether clicks and ticks may mutate the session in this phase.
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

// ---------------------------------------------------------------------------
// Speed
// ---------------------------------------------------------------------------

/// Symbolic difficulty level controlling the tick interval.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SpeedLevel {
    /// Slowest cadence (1000ms by default).
    #[default]
    Low,
    /// Medium cadence (500ms by default).
    Medium,
    /// Fastest cadence (250ms by default).
    High,
}

impl SpeedLevel {
    /// All levels, slowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// The lowercase name used on the wire and in config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Look up a level by name, ignoring ASCII case and surrounding
    /// whitespace. Returns `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
    }
}

impl core::fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scoring policy
// ---------------------------------------------------------------------------

/// How clicks in the danger band affect the authoritative score.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DangerPolicy {
    /// The penalty is applied to the session score and the grid is
    /// regenerated, exactly like a target click.
    #[default]
    Authoritative,
    /// The penalty is only reported back so the client can adjust its
    /// displayed score. The session score and grid are left untouched.
    Cosmetic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_level_names_roundtrip() {
        for level in SpeedLevel::ALL {
            assert_eq!(SpeedLevel::from_name(level.as_str()), Some(level));
        }
    }

    #[test]
    fn speed_level_parse_ignores_case_and_whitespace() {
        assert_eq!(SpeedLevel::from_name("HIGH"), Some(SpeedLevel::High));
        assert_eq!(SpeedLevel::from_name(" Medium "), Some(SpeedLevel::Medium));
        assert_eq!(SpeedLevel::from_name("turbo"), None);
        assert_eq!(SpeedLevel::from_name(""), None);
    }

    #[test]
    fn speed_level_serializes_lowercase() {
        let json = serde_json::to_string(&SpeedLevel::Medium).unwrap_or_default();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&Phase::Running).unwrap_or_default();
        assert_eq!(json, "\"running\"");
        assert!(Phase::Running.is_running());
        assert!(!Phase::Ended.is_running());
    }
}
