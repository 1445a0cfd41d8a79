//! The session controller.
//!
//! A `Session` owns the timeline of one game and serialises every state
//! transition through a single busy guard. It is shared as `Arc<Session>`:
//! the front end calls it directly, the autoplay loop runs as a spawned task
//! holding another clone.
//!
//! Locking rule: the inner `Mutex` is only held for synchronous work and is
//! never held across an `.await`. The oracle runs on the blocking pool
//! against a cloned state; its result is committed only if the timeline has
//! not been replaced in the meantime.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::config::SessionConfig;
use super::control::{MoveGuard, SessionControl};
use super::timeline::Timeline;
use crate::core::{GameRng, GameState, Move};
use crate::error::{OracleError, Result};
use crate::games::{AnyState, GameKind, GameRegistry, GameSetup};
use crate::mcts::{Mcts, SearchBudget, SearchOracle, SearchTree};

/// Why a request was refused without touching the timeline.
///
/// These are routine flow control, not faults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Another transition is in flight.
    Busy,
    /// Autoplay owns the session.
    Autoplaying,
    /// The current state is terminal.
    Terminal,
    /// Nothing to undo or redo.
    OutOfRange,
    /// The timeline was replaced while the transition was running.
    Superseded,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Busy => "a move is already in progress",
            Rejection::Autoplaying => "autoplay is running",
            Rejection::Terminal => "the game is over",
            Rejection::OutOfRange => "no history in that direction",
            Rejection::Superseded => "the game was reset during the move",
        };
        f.write_str(reason)
    }
}

/// Outcome of a request that can change the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// The timeline cursor now sits at `history_index`.
    Committed { history_index: usize },
    Rejected(Rejection),
}

impl Transition {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Transition::Committed { .. })
    }

    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Transition::Rejected(reason) => Some(*reason),
            Transition::Committed { .. } => None,
        }
    }
}

/// Outcome of `toggle_autoplay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoplayToggle {
    Started,
    Stopped,
    Rejected(Rejection),
}

/// What a front end needs to draw the session.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub state: AnyState,
    pub kind: GameKind,
    pub history_index: usize,
    pub history_len: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    /// A player or oracle move would be accepted.
    pub can_play: bool,
    /// `toggle_autoplay` would start or stop the loop.
    pub can_autoplay: bool,
    pub is_autoplaying: bool,
    pub ai_follows_player: bool,
    /// Tree from the most recent search, if it still matches the history.
    pub tree: Option<Arc<SearchTree>>,
}

struct Inner {
    kind: GameKind,
    timeline: Timeline<AnyState>,
    tree: Option<Arc<SearchTree>>,
    rng: GameRng,
}

/// Controller for one game session.
pub struct Session {
    registry: GameRegistry,
    setup: GameSetup,
    budget: SearchBudget,
    autoplay_delay: std::time::Duration,
    oracle: Arc<dyn SearchOracle<AnyState>>,
    control: SessionControl,
    inner: Mutex<Inner>,
    autoplay_task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("budget", &self.budget)
            .field("control", &self.control)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session with the bundled MCTS oracle.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let oracle = Arc::new(Mcts::new(config.mcts.clone()));
        Self::with_oracle(config, oracle)
    }

    /// Start a session with a caller-supplied oracle.
    #[instrument(skip(oracle), fields(game = %config.game))]
    pub fn with_oracle(
        config: SessionConfig,
        oracle: Arc<dyn SearchOracle<AnyState>>,
    ) -> Result<Self> {
        let registry = GameRegistry::new();
        let setup = config.setup();
        let mut rng = GameRng::new(config.seed);
        let initial = registry.create(config.game, &setup, &mut rng)?;
        info!(state = %initial.label(), "session started");

        Ok(Self {
            registry,
            setup,
            budget: config.budget(),
            autoplay_delay: config.autoplay_delay(),
            oracle,
            control: SessionControl::new(config.ai_follows_player),
            inner: Mutex::new(Inner {
                kind: config.game,
                timeline: Timeline::new(initial),
                tree: None,
                rng,
            }),
            autoplay_task: Mutex::new(None),
        })
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the busy guard for a request that must not overlap autoplay.
    fn begin_request(&self) -> std::result::Result<MoveGuard<'_>, Rejection> {
        if self.control.is_autoplaying() {
            return Err(Rejection::Autoplaying);
        }
        self.control.try_begin_move().ok_or(Rejection::Busy)
    }

    // === Queries ===

    /// The state under the timeline cursor.
    #[must_use]
    pub fn current_state(&self) -> AnyState {
        self.inner().timeline.current().clone()
    }

    #[must_use]
    pub fn kind(&self) -> GameKind {
        self.inner().kind
    }

    /// Tree from the most recent search, if any.
    #[must_use]
    pub fn tree(&self) -> Option<Arc<SearchTree>> {
        self.inner().tree.clone()
    }

    #[must_use]
    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    #[must_use]
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.control.is_autoplaying()
    }

    #[must_use]
    pub fn ai_follows_player(&self) -> bool {
        self.control.ai_follows_player()
    }

    /// Observable state for a front end.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner();
        let state = inner.timeline.current().clone();
        let busy = self.control.is_busy();
        let autoplaying = self.control.is_autoplaying();
        let idle = !busy && !autoplaying;
        let terminal = state.is_terminal();

        SessionSnapshot {
            kind: inner.kind,
            history_index: inner.timeline.index(),
            history_len: inner.timeline.len(),
            can_undo: idle && inner.timeline.can_undo(),
            can_redo: idle && inner.timeline.can_redo(),
            can_play: idle && !terminal,
            can_autoplay: autoplaying || (!busy && !terminal),
            is_autoplaying: autoplaying,
            ai_follows_player: self.control.ai_follows_player(),
            tree: inner.tree.clone(),
            state,
        }
    }

    // === Policy ===

    pub fn set_ai_follows_player(&self, enabled: bool) {
        self.control.set_ai_follows_player(enabled);
        debug!(enabled, "ai follows player");
    }

    /// Flip the AI policy, returning the new value.
    pub fn toggle_ai_follows_player(&self) -> bool {
        let enabled = self.control.toggle_ai_follows_player();
        debug!(enabled, "ai follows player");
        enabled
    }

    // === Transitions ===

    /// Play `mv` for the side to move.
    ///
    /// An illegal token is an error and leaves the timeline untouched. When
    /// the AI policy is on and the game goes on, the oracle replies under the
    /// same busy guard; if that reply fails, the player move stays committed
    /// and the oracle error is returned.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub async fn submit_player_move(&self, mv: &Move) -> Result<Transition> {
        let _guard = match self.begin_request() {
            Ok(guard) => guard,
            Err(reason) => {
                debug!(%reason, "player move rejected");
                return Ok(Transition::Rejected(reason));
            }
        };

        let (history_index, follow_up) = {
            let mut inner = self.inner();
            let current = inner.timeline.current();
            if current.is_terminal() {
                debug!("player move rejected: game over");
                return Ok(Transition::Rejected(Rejection::Terminal));
            }
            let next = current.make_move(mv)?;
            let follow_up = !next.is_terminal() && self.control.ai_follows_player();
            info!(state = %next.label(), "player move committed");
            (inner.timeline.push(next), follow_up)
        };

        if follow_up {
            return self.oracle_step().await;
        }
        Ok(Transition::Committed { history_index })
    }

    /// Ask the oracle to move for the side to move.
    #[instrument(skip(self))]
    pub async fn request_oracle_move(&self) -> Result<Transition> {
        let _guard = match self.begin_request() {
            Ok(guard) => guard,
            Err(reason) => {
                debug!(%reason, "oracle move rejected");
                return Ok(Transition::Rejected(reason));
            }
        };
        self.oracle_step().await
    }

    /// One oracle transition. The caller holds the busy guard.
    async fn oracle_step(&self) -> Result<Transition> {
        let (state, epoch) = {
            let inner = self.inner();
            (inner.timeline.current().clone(), self.control.epoch())
        };
        if state.is_terminal() {
            return Ok(Transition::Rejected(Rejection::Terminal));
        }

        let oracle = Arc::clone(&self.oracle);
        let budget = self.budget;
        let searched = state.clone();
        let outcome = tokio::task::spawn_blocking(move || oracle.search(&searched, &budget))
            .await
            .map_err(|err| OracleError::Worker {
                message: err.to_string(),
            })??;

        let mut inner = self.inner();
        if self.control.epoch() != epoch {
            debug!("oracle result discarded: timeline replaced");
            return Ok(Transition::Rejected(Rejection::Superseded));
        }
        let current = inner.timeline.current();
        if !current.is_legal(&outcome.mv) {
            return Err(OracleError::ReturnedIllegalMove {
                token: outcome.mv.to_string(),
                label: current.label(),
            }
            .into());
        }
        let next = current.make_move(&outcome.mv)?;
        info!(
            mv = %outcome.mv,
            state = %next.label(),
            iterations = outcome.stats.iterations,
            "oracle move committed"
        );
        let history_index = inner.timeline.push(next);
        inner.tree = Some(Arc::new(outcome.tree));
        Ok(Transition::Committed { history_index })
    }

    /// Step the cursor back one state.
    #[instrument(skip(self))]
    pub fn undo(&self) -> Transition {
        self.shift(|timeline| timeline.undo().is_some())
    }

    /// Step the cursor forward one state.
    #[instrument(skip(self))]
    pub fn redo(&self) -> Transition {
        self.shift(|timeline| timeline.redo().is_some())
    }

    fn shift(&self, step: impl FnOnce(&mut Timeline<AnyState>) -> bool) -> Transition {
        let _guard = match self.begin_request() {
            Ok(guard) => guard,
            Err(reason) => return Transition::Rejected(reason),
        };
        let mut inner = self.inner();
        if !step(&mut inner.timeline) {
            return Transition::Rejected(Rejection::OutOfRange);
        }
        inner.tree = None;
        let history_index = inner.timeline.index();
        debug!(history_index, "cursor moved");
        Transition::Committed { history_index }
    }

    // === Autoplay ===

    /// Start autoplay, or stop it if it is running.
    ///
    /// Must be called from within a tokio runtime; the loop runs on a spawned task.
    #[instrument(skip(self))]
    pub fn toggle_autoplay(self: &Arc<Self>) -> AutoplayToggle {
        if self.control.stop_autoplay() {
            info!("autoplay stopped");
            return AutoplayToggle::Stopped;
        }
        if self.current_state().is_terminal() {
            return AutoplayToggle::Rejected(Rejection::Terminal);
        }
        if self.control.is_busy() {
            return AutoplayToggle::Rejected(Rejection::Busy);
        }
        let Some(run) = self.control.start_autoplay() else {
            return AutoplayToggle::Rejected(Rejection::Autoplaying);
        };

        info!(run, "autoplay started");
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move { session.autoplay_loop(run).await });
        // A previously stopped loop keeps running detached until its last
        // step settles.
        self.autoplay_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        AutoplayToggle::Started
    }

    async fn autoplay_loop(&self, run: u64) {
        while self.control.autoplay_continues(run) {
            let step = match self.control.try_begin_move() {
                Some(_guard) => self.oracle_step().await,
                None => Ok(Transition::Rejected(Rejection::Busy)),
            };
            match step {
                Ok(Transition::Committed { .. }) | Ok(Transition::Rejected(Rejection::Busy)) => {}
                Ok(Transition::Rejected(reason)) => {
                    debug!(%reason, "autoplay halted");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "autoplay step failed");
                    break;
                }
            }
            if self.current_state().is_terminal() {
                info!("autoplay reached a terminal state");
                break;
            }
            tokio::time::sleep(self.autoplay_delay).await;
        }
        self.control.finish_autoplay(run);
    }

    /// Ask the autoplay loop to stop before its next step.
    ///
    /// An in-flight step still settles. Returns whether autoplay was on.
    pub fn stop_autoplay(&self) -> bool {
        let was_on = self.control.stop_autoplay();
        if was_on {
            info!("autoplay stopped");
        }
        was_on
    }

    /// Wait for the most recent autoplay loop to exit.
    pub async fn join_autoplay(&self) {
        let handle = self
            .autoplay_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "autoplay task ended abnormally");
            }
        }
    }

    // === Lifecycle ===

    /// Start the current game over.
    #[instrument(skip(self))]
    pub fn reset_game(&self) -> Result<()> {
        let kind = self.kind();
        self.change_game(kind)
    }

    /// Switch to a fresh game of `kind`.
    ///
    /// Stops autoplay, drops the history and the tree. A transition still
    /// running against the old timeline is discarded when it settles.
    #[instrument(skip(self))]
    pub fn change_game(&self, kind: GameKind) -> Result<()> {
        self.stop_autoplay();
        let mut inner = self.inner();
        let initial = self.registry.create(kind, &self.setup, &mut inner.rng)?;
        self.control.bump_epoch();
        info!(%kind, state = %initial.label(), "new game");
        inner.kind = kind;
        inner.timeline.reset(initial);
        inner.tree = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> SessionConfig {
        SessionConfig::default()
            .with_ai_follows_player(false)
            .with_search(1.414, 200, 0.0)
    }

    #[test]
    fn test_new_session_snapshot() {
        let session = Session::new(quiet_config()).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.kind, GameKind::Grid);
        assert_eq!(snap.history_index, 0);
        assert_eq!(snap.history_len, 1);
        assert!(snap.can_play);
        assert!(snap.can_autoplay);
        assert!(!snap.can_undo);
        assert!(!snap.can_redo);
        assert!(snap.tree.is_none());
    }

    #[test]
    fn test_undo_at_start_is_out_of_range() {
        let session = Session::new(quiet_config()).unwrap();
        assert_eq!(session.undo(), Transition::Rejected(Rejection::OutOfRange));
        assert_eq!(session.redo(), Transition::Rejected(Rejection::OutOfRange));
    }

    #[tokio::test]
    async fn test_busy_guard_rejects_overlap() {
        let session = Session::new(quiet_config()).unwrap();
        let _held = session.control.try_begin_move().unwrap();

        let result = session.submit_player_move(&Move::from("4")).await.unwrap();
        assert_eq!(result, Transition::Rejected(Rejection::Busy));
        assert_eq!(session.undo(), Transition::Rejected(Rejection::Busy));
        assert!(!session.snapshot().can_play);
        assert_eq!(session.snapshot().history_len, 1);
    }

    #[test]
    fn test_change_game_supersedes_epoch() {
        let session = Session::new(quiet_config()).unwrap();
        let before = session.control.epoch();
        session.change_game(GameKind::Abduction).unwrap();
        assert_eq!(session.kind(), GameKind::Abduction);
        assert!(session.control.epoch() > before);
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::Busy.to_string(), "a move is already in progress");
        assert!(Transition::Committed { history_index: 1 }.is_committed());
        assert_eq!(
            Transition::Rejected(Rejection::Terminal).rejection(),
            Some(Rejection::Terminal)
        );
    }
}
