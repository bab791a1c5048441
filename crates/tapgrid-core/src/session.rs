//! The authoritative game session and its phase state machine.
//!
//! [`GameSession`] owns everything that scoring depends on: phase,
//! score, active speed, and the current grid. It is synchronous and
//! timer-free. The [`engine`](crate::engine) module wraps it in a lock
//! and drives [`tick`](GameSession::tick) from a scheduler task.
//!
//! # Invariants
//!
//! - The score only changes while the phase is [`Phase::Running`].
//! - The grid is empty whenever the phase is not Running.
//! - `start()` resets the score to 0 and generates a grid immediately.
//! - Every arm or disarm of the tick timer bumps the scheduler epoch.
//!   A tick carrying an older epoch is ignored, so a timer that fires
//!   after `stop()` or a speed change cannot touch the grid.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tapgrid_types::{
    CellKind, ClickOutcome, GameId, GameStatus, GridCell, GridSnapshot, HighlightHint, Phase,
    SpeedLevel,
};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::GridGenerator;
use crate::scoring::ClickResolver;
use crate::speed::SpeedTable;

/// Result of [`GameSession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new game began: score reset, grid generated, timer must be armed.
    Started,
    /// The game was already running. Nothing changed.
    AlreadyRunning,
}

/// Result of [`GameSession::set_speed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedChange {
    /// Level before the change.
    pub previous: SpeedLevel,
    /// Level after the change.
    pub current: SpeedLevel,
    /// Tick interval of the new level.
    pub interval: Duration,
    /// Same interval in whole milliseconds, as reported to clients.
    pub interval_ms: u64,
    /// Whether the tick timer must be re-armed (the session is Running).
    pub rearm: bool,
}

/// One player's game state.
#[derive(Debug)]
pub struct GameSession {
    game_id: GameId,
    phase: Phase,
    score: i64,
    speed: SpeedLevel,
    speeds: SpeedTable,
    grid: Vec<GridCell>,
    generator: GridGenerator,
    resolver: ClickResolver,
    rng: SmallRng,
    /// Grids generated since the last start.
    generation: u64,
    /// Timer-driven regenerations since the last start.
    ticks: u64,
    /// Scheduler arming epoch.
    epoch: u64,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Create an Idle session from validated configuration.
    ///
    /// Display offsets are drawn from `grid.seed` when set, otherwise
    /// from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the configuration is unplayable.
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let rng = config
            .grid
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        Ok(Self::with_rng(config, rng))
    }

    /// Create an Idle session with an explicit RNG. The configuration is
    /// not validated.
    pub fn with_rng(config: &GameConfig, rng: SmallRng) -> Self {
        Self {
            game_id: GameId::new(),
            phase: Phase::Idle,
            score: 0,
            speed: config.speed.initial,
            speeds: SpeedTable::new(&config.speed),
            grid: Vec::new(),
            generator: GridGenerator::new(&config.grid),
            resolver: ClickResolver::new(&config.scoring),
            rng,
            generation: 0,
            ticks: 0,
            epoch: 0,
            started_at: None,
            ended_at: None,
        }
    }

    // -----------------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------------

    /// Enter Running from Idle or Ended.
    ///
    /// Resets the score to 0, assigns a fresh [`GameId`], and generates
    /// the first grid immediately. Calling this while already Running is
    /// a no-op that returns [`StartOutcome::AlreadyRunning`].
    pub fn start(&mut self) -> StartOutcome {
        if self.phase.is_running() {
            debug!(game_id = %self.game_id, "start ignored, game already running");
            return StartOutcome::AlreadyRunning;
        }

        self.game_id = GameId::new();
        self.phase = Phase::Running;
        self.score = 0;
        self.generation = 0;
        self.ticks = 0;
        self.started_at = Some(Utc::now());
        self.ended_at = None;
        self.epoch = self.epoch.wrapping_add(1);
        self.regenerate();

        info!(
            game_id = %self.game_id,
            speed = %self.speed,
            interval_ms = self.tick_interval_ms(),
            targets = self.grid.len(),
            "Game started"
        );
        StartOutcome::Started
    }

    /// Leave Running for Ended and return the final score.
    ///
    /// Clears the grid and invalidates the armed timer. While Idle or
    /// Ended this changes nothing and returns the current score.
    pub fn stop(&mut self) -> i64 {
        if !self.phase.is_running() {
            debug!(phase = ?self.phase, "stop ignored, game not running");
            return self.score;
        }

        self.phase = Phase::Ended;
        self.grid.clear();
        self.ended_at = Some(Utc::now());
        self.epoch = self.epoch.wrapping_add(1);

        info!(
            game_id = %self.game_id,
            final_score = self.score,
            generations = self.generation,
            ticks = self.ticks,
            "Game stopped"
        );
        self.score
    }

    /// Change the active speed level.
    ///
    /// While Running the timer epoch advances and the caller must re-arm
    /// the scheduler with [`SpeedChange::interval`]. The next tick then
    /// fires one full interval after the change. Otherwise the level is
    /// simply stored for the next game.
    pub fn set_speed(&mut self, level: SpeedLevel) -> SpeedChange {
        let previous = self.speed;
        self.speed = level;
        let rearm = self.phase.is_running();
        if rearm {
            self.epoch = self.epoch.wrapping_add(1);
        }

        info!(
            previous = %previous,
            current = %level,
            interval_ms = self.tick_interval_ms(),
            rearm,
            "Speed changed"
        );
        SpeedChange {
            previous,
            current: level,
            interval: self.tick_interval(),
            interval_ms: self.tick_interval_ms(),
            rearm,
        }
    }

    // -----------------------------------------------------------------------
    // Grid updates
    // -----------------------------------------------------------------------

    /// Apply one timer tick armed at `epoch`.
    ///
    /// Returns `true` if the grid was regenerated. Returns `false`, and
    /// changes nothing, when the session is not Running or `epoch` is not
    /// the current scheduler epoch.
    pub fn tick(&mut self, epoch: u64) -> bool {
        if !self.phase.is_running() || epoch != self.epoch {
            debug!(
                epoch,
                current_epoch = self.epoch,
                phase = ?self.phase,
                "stale tick ignored"
            );
            return false;
        }
        self.ticks = self.ticks.saturating_add(1);
        self.regenerate();
        debug!(generation = self.generation, ticks = self.ticks, "Tick");
        true
    }

    /// Resolve a click at (`row`, `col`) and apply its score delta.
    ///
    /// Outside the Running phase the click is a no-op with a zero delta.
    /// A scoring click that is applied also forces an immediate
    /// regeneration, independent of the tick schedule.
    pub fn resolve_click(&mut self, row: u32, col: u32) -> ClickOutcome {
        let kind = self.generator.classify(&self.grid, row, col);

        if !self.phase.is_running() {
            debug!(row, col, phase = ?self.phase, "click ignored, game not running");
            return ClickOutcome {
                row,
                col,
                kind,
                score_delta: 0,
                applied: false,
                score: self.score,
                regenerated: false,
                highlight: None,
            };
        }

        let decision = self.resolver.resolve(kind);
        if decision.applied {
            self.score = self.score.saturating_add(decision.delta);
        }
        if decision.regenerate {
            self.regenerate();
        }

        debug!(
            row,
            col,
            ?kind,
            delta = decision.delta,
            applied = decision.applied,
            score = self.score,
            "Click resolved"
        );

        ClickOutcome {
            row,
            col,
            kind,
            score_delta: decision.delta,
            applied: decision.applied,
            score: self.score,
            regenerated: decision.regenerate,
            highlight: (kind != CellKind::Empty).then(HighlightHint::default),
        }
    }

    fn regenerate(&mut self) {
        self.grid = self.generator.generate(&mut self.rng);
        self.generation = self.generation.saturating_add(1);
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Current grid as seen by clients.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            game_id: self.game_id,
            phase: self.phase,
            score: self.score,
            speed: self.speed,
            tick_interval_ms: self.tick_interval_ms(),
            generation: self.generation,
            ticks: self.ticks,
            layout: self.generator.layout(),
            grid: self.grid.clone(),
        }
    }

    /// Session status for control surfaces.
    pub fn status(&self) -> GameStatus {
        GameStatus {
            game_id: self.game_id,
            phase: self.phase,
            score: self.score,
            final_score: (self.phase == Phase::Ended).then_some(self.score),
            speed: self.speed,
            tick_interval_ms: self.tick_interval_ms(),
            generation: self.generation,
            ticks: self.ticks,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    /// Current game identifier.
    pub const fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Authoritative score.
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Active speed level.
    pub const fn speed(&self) -> SpeedLevel {
        self.speed
    }

    /// Tick interval of the active speed level.
    pub const fn tick_interval(&self) -> Duration {
        self.speeds.interval(self.speed)
    }

    /// Tick interval of the active speed level, in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.speeds.interval_ms(self.speed)
    }

    /// Current target cells.
    pub fn grid(&self) -> &[GridCell] {
        &self.grid
    }

    /// Grids generated since the last start.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Timer-driven regenerations since the last start.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Scheduler epoch the next armed timer must carry.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }
}
