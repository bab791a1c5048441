//! Axum router construction for the game API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled, since the browser client is served from a
//! different origin.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{control, handlers, ws};

/// Build the complete Axum router for the game server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /grid` -- current grid snapshot
/// - `POST /click` -- resolve a click
/// - `POST /start` -- start a game
/// - `POST /stop` -- stop the game
/// - `POST /speed` -- change the speed level
/// - `GET /status` -- session status
/// - `GET /ws/grid` -- `WebSocket` grid snapshot stream
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // Game API
        .route("/grid", get(handlers::get_grid))
        .route("/click", post(handlers::click))
        .route("/status", get(handlers::status))
        // Controls
        .route("/start", post(control::start))
        .route("/stop", post(control::stop))
        .route("/speed", post(control::set_speed))
        // WebSocket
        .route("/ws/grid", get(ws::ws_grid))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
