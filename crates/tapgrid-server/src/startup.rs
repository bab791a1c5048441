//! Server startup helper for the engine binary.
//!
//! Provides [`spawn_server`] which binds the game API listener and then
//! serves it on a background Tokio task, so the binary can keep its main
//! task free for signal handling.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError, serve};
use crate::state::AppState;

/// Errors that can occur when spawning the game server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A server running on a background task.
#[derive(Debug)]
pub struct SpawnedServer {
    /// Address the listener is bound to.
    pub addr: SocketAddr,
    /// Task serving requests. Abort it to stop the server.
    pub handle: JoinHandle<()>,
}

/// Bind the configured address and serve the game API on a background
/// Tokio task.
///
/// The bind happens before the task is spawned, so an occupied port or
/// bad host is reported here rather than inside the task. Port `0`
/// selects an ephemeral port; the chosen address is returned.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot
/// be bound.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<SpawnedServer, StartupError> {
    let requested = config.socket_addr()?;
    let listener = TcpListener::bind(requested)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {requested}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            tracing::error!(error = %e, "Game server exited with error");
        }
    });

    tracing::info!(%addr, "Game server spawned on background task");

    Ok(SpawnedServer { addr, handle })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tapgrid_core::{GameConfig, GameEngine};

    use super::*;

    #[tokio::test]
    async fn spawns_on_ephemeral_port() {
        let engine = GameEngine::from_config(&GameConfig::default()).unwrap();
        let state = Arc::new(AppState::new(engine));
        let config = ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 0,
        };

        let server = spawn_server(&config, state).await.unwrap();
        assert_ne!(server.addr.port(), 0);
        assert!(!server.handle.is_finished());
        server.handle.abort();
    }

    #[tokio::test]
    async fn reports_occupied_port() {
        let engine = GameEngine::from_config(&GameConfig::default()).unwrap();
        let state = Arc::new(AppState::new(engine));
        let config = ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 0,
        };
        let first = spawn_server(&config, Arc::clone(&state)).await.unwrap();

        let taken = ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: first.addr.port(),
        };
        let second = spawn_server(&taken, state).await;
        assert!(matches!(
            second,
            Err(StartupError::Server(ServerError::Bind(_)))
        ));
        first.handle.abort();
    }
}
