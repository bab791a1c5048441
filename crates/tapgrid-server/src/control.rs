//! Game control handlers: start, stop, and speed changes.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/start` | Start a new game (no-op while running) |
//! | `POST` | `/stop` | End the game and report the final score |
//! | `POST` | `/speed` | Change the tick speed level |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tapgrid_core::StartOutcome;
use tapgrid_types::{GridSnapshot, SpeedLevel};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /speed`.
#[derive(Debug, Deserialize)]
pub struct SetSpeedRequest {
    /// Level name: `low`, `medium`, or `high` (case-insensitive).
    pub level: String,
}

/// Response body for `POST /start`.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// Always true.
    pub ok: bool,
    /// False when the game was already running and nothing changed.
    pub started: bool,
    /// Snapshot after the call.
    pub snapshot: GridSnapshot,
}

/// Response body for `POST /stop`.
#[derive(Debug, Serialize)]
pub struct StopResponse {
    /// Always true.
    pub ok: bool,
    /// Score frozen at the moment the game ended.
    pub final_score: i64,
}

/// Response body for `POST /speed`.
#[derive(Debug, Serialize)]
pub struct SpeedResponse {
    /// Always true.
    pub ok: bool,
    /// Level before the change.
    pub previous: SpeedLevel,
    /// Level now active.
    pub current: SpeedLevel,
    /// Tick interval of the active level.
    pub tick_interval_ms: u64,
}

// ---------------------------------------------------------------------------
// POST /start
// ---------------------------------------------------------------------------

/// Start a new game: score reset to 0, grid generated, ticks armed.
pub async fn start(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (outcome, snapshot) = state.engine.start().await;
    Json(StartResponse {
        ok: true,
        started: outcome == StartOutcome::Started,
        snapshot,
    })
}

// ---------------------------------------------------------------------------
// POST /stop
// ---------------------------------------------------------------------------

/// Stop the game. Once this returns no further tick fires.
pub async fn stop(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let final_score = state.engine.stop().await;
    Json(StopResponse {
        ok: true,
        final_score,
    })
}

// ---------------------------------------------------------------------------
// POST /speed
// ---------------------------------------------------------------------------

/// Change the speed level. The new interval applies from the next tick;
/// the current grid is not regenerated.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SetSpeedRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let change = state.engine.set_speed_by_name(&body.level).await?;

    Ok(Json(SpeedResponse {
        ok: true,
        previous: change.previous,
        current: change.current,
        tick_interval_ms: change.interval_ms,
    }))
}
