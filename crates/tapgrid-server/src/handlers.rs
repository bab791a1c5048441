//! Game API endpoint handlers for the grid, clicks, and status.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/grid` | Current grid snapshot |
//! | `POST` | `/click` | Resolve a click at `{row, col}` |
//! | `GET` | `/status` | Session status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{Html, IntoResponse};
use serde::{Deserialize, Serialize};
use tapgrid_types::ClickOutcome;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /click`.
///
/// Coordinates are signed so that a negative value resolves to an empty
/// zone instead of a rejected request.
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    /// Clicked row.
    pub row: i64,
    /// Clicked column.
    pub col: i64,
}

/// Response body for `POST /click`.
///
/// Carries the full [`ClickOutcome`] plus `scoreChange`, the field the
/// browser client reads to update its local score display.
#[derive(Debug, Serialize)]
pub struct ClickResponse {
    /// Resolution details.
    #[serde(flatten)]
    pub outcome: ClickOutcome,
    /// Same value as `score_delta`.
    #[serde(rename = "scoreChange")]
    pub score_change: i64,
}

/// Map a signed client coordinate into the grid's coordinate space.
/// Anything unrepresentable lands far outside every zone.
fn coordinate(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the session status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.engine.status().await;
    let phase = format!("{:?}", status.phase);
    let score = status.score;
    let speed = status.speed;
    let interval = status.tick_interval_ms;
    let generation = status.generation;
    let ticks = status.ticks;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Tapgrid</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .verb {{ color: #7ee787; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Tapgrid</h1>
    <p class="subtitle">Reaction game server</p>

    <div>
        <div class="metric">
            <div class="label">Phase</div>
            <div class="value">{phase}</div>
        </div>
        <div class="metric">
            <div class="label">Score</div>
            <div class="value">{score}</div>
        </div>
        <div class="metric">
            <div class="label">Speed</div>
            <div class="value">{speed} ({interval}ms)</div>
        </div>
        <div class="metric">
            <div class="label">Generation</div>
            <div class="value">{generation}</div>
        </div>
        <div class="metric">
            <div class="label">Ticks</div>
            <div class="value">{ticks}</div>
        </div>
    </div>

    <h2>Endpoints</h2>
    <ul>
        <li><span class="verb">GET</span> <a href="/grid">/grid</a></li>
        <li><span class="verb">GET</span> <a href="/status">/status</a></li>
        <li><span class="verb">POST</span> /click</li>
        <li><span class="verb">POST</span> /start</li>
        <li><span class="verb">POST</span> /stop</li>
        <li><span class="verb">POST</span> /speed</li>
        <li><span class="verb">GET</span> /ws/grid</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /grid
// ---------------------------------------------------------------------------

/// Return the current grid snapshot. Idempotent and safe to poll.
pub async fn get_grid(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.snapshot().await)
}

// ---------------------------------------------------------------------------
// POST /click
// ---------------------------------------------------------------------------

/// Resolve a click. Clicks outside every zone, or while the game is not
/// running, come back with a zero delta. Only a malformed body is
/// rejected.
pub async fn click(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ClickRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let outcome = state
        .engine
        .click(coordinate(body.row), coordinate(body.col))
        .await;

    Ok(Json(ClickResponse {
        score_change: outcome.score_delta,
        outcome,
    }))
}

// ---------------------------------------------------------------------------
// GET /status
// ---------------------------------------------------------------------------

/// Return the session status.
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.status().await)
}
