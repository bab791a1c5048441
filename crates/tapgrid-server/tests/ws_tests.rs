//! Integration tests for the `/ws/grid` snapshot stream.
//!
//! Each test binds a real listener on an ephemeral port and connects
//! with a `WebSocket` client.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tapgrid_core::config::SpeedConfig;
use tapgrid_core::{GameConfig, GameEngine};
use tapgrid_server::state::AppState;
use tapgrid_server::{ServerConfig, spawn_server};
use tapgrid_types::SpeedLevel;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Engine whose ticks are far enough apart that none fires mid-test.
fn quiet_engine() -> GameEngine {
    let config = GameConfig {
        speed: SpeedConfig {
            low_ms: 60_000,
            ..SpeedConfig::default()
        },
        ..GameConfig::default()
    };
    GameEngine::from_config(&config).unwrap()
}

async fn connect(engine: &GameEngine) -> Client {
    let state = Arc::new(AppState::new(engine.clone()));
    let config = ServerConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
    };
    let server = spawn_server(&config, state).await.unwrap();
    connect_async(format!("ws://{}/ws/grid", server.addr))
        .await
        .unwrap()
        .0
}

async fn next_frame(client: &mut Client) -> Value {
    let message = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    serde_json::from_str(message.to_text().unwrap()).unwrap()
}

#[tokio::test]
async fn test_first_frame_is_current_snapshot() {
    let engine = quiet_engine();
    let mut client = connect(&engine).await;

    let first = next_frame(&mut client).await;
    assert_eq!(first["phase"], "idle");
    assert_eq!(first["grid"].as_array().unwrap().len(), 0);
    assert_eq!(first["score"], 0);
}

#[tokio::test]
async fn test_stream_follows_start_and_stop() {
    let engine = quiet_engine();
    let mut client = connect(&engine).await;
    assert_eq!(next_frame(&mut client).await["phase"], "idle");

    engine.start().await;
    let running = next_frame(&mut client).await;
    assert_eq!(running["phase"], "running");
    assert_eq!(running["generation"], 1);
    assert_eq!(running["grid"].as_array().unwrap().len(), 20);

    engine.stop().await;
    let ended = next_frame(&mut client).await;
    assert_eq!(ended["phase"], "ended");
    assert!(ended["grid"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_speed_change_is_streamed() {
    let engine = quiet_engine();
    let mut client = connect(&engine).await;
    let _ = next_frame(&mut client).await;

    engine.start().await;
    let running = next_frame(&mut client).await;

    engine.set_speed(SpeedLevel::Medium).await;
    let changed = next_frame(&mut client).await;
    assert_eq!(changed["tick_interval_ms"], 500);
    assert_eq!(changed["generation"], 1);
    assert_eq!(changed["grid"], running["grid"]);
}
