//! Core data structures shared between the game engine and its clients.
//!
//! These are the payloads the Presentation Adapter sees: grid snapshots,
//! click outcomes, and session status. All of them serialize to JSON
//! and export TypeScript bindings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CellKind, Phase, SpeedLevel};
use crate::ids::GameId;

// ---------------------------------------------------------------------------
// Grid cells
// ---------------------------------------------------------------------------

/// Display offset of a target, in viewport-height units.
///
/// Purely cosmetic. Two cells may share the same offset and scoring
/// never reads these values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellOffset {
    /// Distance from the top of the play area.
    pub top: u32,
    /// Distance from the left of the play area.
    pub left: u32,
}

/// One cell of a generated grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridCell {
    /// Index of the cell within its generation (0-based).
    pub id: u32,
    /// Structural row (0-based).
    pub row: u32,
    /// Structural column (0-based).
    pub col: u32,
    /// What the cell is.
    pub kind: CellKind,
    /// Randomized display placement.
    pub offset: CellOffset,
}

/// Static shape of the click coordinate space.
///
/// Target rows come first. The danger band sits directly below them,
/// covering rows `target_rows .. target_rows + danger_rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridLayout {
    /// Cells per row.
    pub columns: u32,
    /// Rows spanned by target cells.
    pub target_rows: u32,
    /// Rows in the danger band.
    pub danger_rows: u32,
}

impl GridLayout {
    /// First row of the danger band.
    pub const fn danger_start(&self) -> u32 {
        self.target_rows
    }

    /// One past the last row of the danger band.
    pub const fn danger_end(&self) -> u32 {
        self.target_rows.saturating_add(self.danger_rows)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The grid as visible to clients at one point in time.
///
/// `grid` holds the target cells of the current generation. It is empty
/// whenever the phase is not [`Phase::Running`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridSnapshot {
    /// The game this snapshot belongs to.
    pub game_id: GameId,
    /// Session phase.
    pub phase: Phase,
    /// Authoritative score.
    pub score: i64,
    /// Active speed level.
    pub speed: SpeedLevel,
    /// Tick interval for the active speed level, in milliseconds.
    pub tick_interval_ms: u64,
    /// Grids generated since the game started (start, ticks and clicks).
    pub generation: u64,
    /// Timer-driven regenerations since the game started.
    pub ticks: u64,
    /// Shape of the click space.
    pub layout: GridLayout,
    /// Target cells of the current generation.
    pub grid: Vec<GridCell>,
}

// ---------------------------------------------------------------------------
// Clicks
// ---------------------------------------------------------------------------

/// Blink schedule the client may play on the clicked cell.
///
/// Pulse `i` turns the highlight on at `i * pulse_ms` and off again
/// `on_ms` later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HighlightHint {
    /// Number of on/off pulses.
    pub pulses: u32,
    /// Milliseconds between pulse starts.
    pub pulse_ms: u32,
    /// Milliseconds each pulse stays on.
    pub on_ms: u32,
}

impl Default for HighlightHint {
    fn default() -> Self {
        Self {
            pulses: 3,
            pulse_ms: 100,
            on_ms: 50,
        }
    }
}

/// Result of resolving one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClickOutcome {
    /// Clicked row.
    pub row: u32,
    /// Clicked column.
    pub col: u32,
    /// Zone the click landed in.
    pub kind: CellKind,
    /// Score change for this click. When `applied` is false the session
    /// score did not move and the value is advisory only.
    pub score_delta: i64,
    /// Whether `score_delta` was added to the authoritative score.
    pub applied: bool,
    /// Authoritative score after the click.
    pub score: i64,
    /// Whether the click forced a fresh grid.
    pub regenerated: bool,
    /// Blink schedule for the clicked cell, if it was a scoring click.
    pub highlight: Option<HighlightHint>,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Session status for control surfaces and the status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStatus {
    /// Current game.
    pub game_id: GameId,
    /// Session phase.
    pub phase: Phase,
    /// Authoritative score.
    pub score: i64,
    /// Frozen score of the last stopped game, set only while Ended.
    pub final_score: Option<i64>,
    /// Active speed level.
    pub speed: SpeedLevel,
    /// Tick interval for the active speed level, in milliseconds.
    pub tick_interval_ms: u64,
    /// Grids generated since the game started.
    pub generation: u64,
    /// Timer-driven regenerations since the game started.
    pub ticks: u64,
    /// When the current game entered Running.
    pub started_at: Option<DateTime<Utc>>,
    /// When the current game was stopped.
    pub ended_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danger_band_sits_below_targets() {
        let layout = GridLayout {
            columns: 10,
            target_rows: 2,
            danger_rows: 2,
        };
        assert_eq!(layout.danger_start(), 2);
        assert_eq!(layout.danger_end(), 4);
    }

    #[test]
    fn default_highlight_is_three_pulses() {
        let hint = HighlightHint::default();
        assert_eq!(hint.pulses, 3);
        assert_eq!(hint.pulse_ms.saturating_mul(hint.pulses), 300);
    }

    #[test]
    fn grid_cell_json_shape() {
        let cell = GridCell {
            id: 3,
            row: 0,
            col: 3,
            kind: CellKind::Target,
            offset: CellOffset { top: 42, left: 17 },
        };
        let json = serde_json::to_value(cell).unwrap_or_default();
        assert_eq!(json["row"], 0);
        assert_eq!(json["col"], 3);
        assert_eq!(json["kind"], "target");
        assert_eq!(json["offset"]["top"], 42);
    }
}
