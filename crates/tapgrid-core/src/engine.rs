//! Shared engine handle: one session, one lock, one tick task.
//!
//! [`GameEngine`] is the only way the outside world touches a
//! [`GameSession`]. Every mutation, whether from an HTTP handler or from
//! the tick task, goes through a single [`tokio::sync::Mutex`], so the
//! session observes operations in a total order. Timer arming and
//! disarming happen under the same lock as the phase change that causes
//! them.
//!
//! Each grid change is published on a broadcast channel while the lock
//! is still held, so subscribers see snapshots in mutation order.

use std::sync::{Arc, Weak};

use tapgrid_types::{ClickOutcome, GameStatus, GridSnapshot, SpeedLevel};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::scheduler::Ticker;
use crate::session::{GameSession, SpeedChange, StartOutcome};
use crate::speed::parse_speed_level;

/// Capacity of the snapshot broadcast channel.
pub const UPDATE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
struct EngineInner {
    session: GameSession,
    ticker: Ticker,
}

/// Cheaply cloneable handle to the running game.
#[derive(Debug, Clone)]
pub struct GameEngine {
    inner: Arc<Mutex<EngineInner>>,
    updates: broadcast::Sender<GridSnapshot>,
}

impl GameEngine {
    /// Wrap an existing session. The tick task is not armed until
    /// [`start`](Self::start).
    pub fn new(session: GameSession) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                session,
                ticker: Ticker::new(),
            })),
            updates,
        }
    }

    /// Build a session from configuration and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the configuration is unplayable.
    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        Ok(Self::new(GameSession::new(config)?))
    }

    /// Subscribe to grid snapshots.
    ///
    /// Receivers only see snapshots published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<GridSnapshot> {
        self.updates.subscribe()
    }

    /// Start a new game and arm the tick task.
    ///
    /// Returns the outcome together with the snapshot current after the
    /// call. While already Running nothing changes and nothing is
    /// published.
    pub async fn start(&self) -> (StartOutcome, GridSnapshot) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let outcome = inner.session.start();
        let snapshot = inner.session.snapshot();

        if outcome == StartOutcome::Started {
            self.arm(inner);
            publish(&self.updates, snapshot.clone());
        }
        (outcome, snapshot)
    }

    /// End the game, disarm the tick task, and return the final score.
    pub async fn stop(&self) -> i64 {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let was_running = inner.session.phase().is_running();
        let final_score = inner.session.stop();
        inner.ticker.disarm();

        if was_running {
            publish(&self.updates, inner.session.snapshot());
        }
        final_score
    }

    /// Change the speed level. While Running the tick task is re-armed so
    /// the next tick fires one new interval from now. The grid itself is
    /// unchanged; the published snapshot carries the new interval.
    pub async fn set_speed(&self, level: SpeedLevel) -> SpeedChange {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let change = inner.session.set_speed(level);
        if change.rearm {
            self.arm(inner);
        }
        publish(&self.updates, inner.session.snapshot());
        change
    }

    /// Change the speed level by name.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSpeedLevel`] for an unknown name. The
    /// current level is kept.
    pub async fn set_speed_by_name(&self, name: &str) -> Result<SpeedChange, GameError> {
        let level = parse_speed_level(name)?;
        Ok(self.set_speed(level).await)
    }

    /// Resolve a click and publish the new grid if it was regenerated.
    pub async fn click(&self, row: u32, col: u32) -> ClickOutcome {
        let mut guard = self.inner.lock().await;
        let outcome = guard.session.resolve_click(row, col);
        if outcome.regenerated {
            publish(&self.updates, guard.session.snapshot());
        }
        outcome
    }

    /// Current grid snapshot.
    pub async fn snapshot(&self) -> GridSnapshot {
        self.inner.lock().await.session.snapshot()
    }

    /// Current session status.
    pub async fn status(&self) -> GameStatus {
        self.inner.lock().await.session.status()
    }

    /// Whether a tick task is currently armed.
    pub async fn is_ticking(&self) -> bool {
        self.inner.lock().await.ticker.is_armed()
    }

    /// Disarm the tick task for process exit. The session keeps its state.
    pub async fn shutdown(&self) {
        let mut guard = self.inner.lock().await;
        guard.ticker.disarm();
        info!(
            phase = ?guard.session.phase(),
            score = guard.session.score(),
            "Engine shut down"
        );
    }

    /// Arm the ticker for the session's current epoch and interval.
    fn arm(&self, inner: &mut EngineInner) {
        let weak = Arc::downgrade(&self.inner);
        let updates = self.updates.clone();
        inner.ticker.arm(
            inner.session.epoch(),
            inner.session.tick_interval(),
            move |epoch| on_tick(Weak::clone(&weak), updates.clone(), epoch),
        );
    }
}

fn publish(updates: &broadcast::Sender<GridSnapshot>, snapshot: GridSnapshot) {
    let generation = snapshot.generation;
    // No subscribers is not an error.
    let receivers = updates.send(snapshot).unwrap_or(0);
    debug!(receivers, generation, "snapshot published");
}

/// Body of one scheduled tick. Returns `false` once the engine is gone or
/// the epoch has moved on, which ends the tick task.
async fn on_tick(
    inner: Weak<Mutex<EngineInner>>,
    updates: broadcast::Sender<GridSnapshot>,
    epoch: u64,
) -> bool {
    let Some(inner) = inner.upgrade() else {
        return false;
    };
    let mut guard = inner.lock().await;
    if !guard.session.tick(epoch) {
        return false;
    }
    publish(&updates, guard.session.snapshot());
    true
}
