//! # mcts-arena
//!
//! Turn-based, perfect-information games played by a human or a search
//! oracle through one contract, with an undoable session controller.
//!
//! ## Design Principles
//!
//! 1. **Immutable States**: `make_move` returns a new state and never touches
//!    the old one. History is a list of values and undo is a cursor move.
//!
//! 2. **One Contract, Closed Set of Games**: every rule engine implements
//!    `GameState`; `AnyState` is the tagged union the session works with.
//!
//! 3. **Never Trust a Token**: every move is re-validated against
//!    `legal_moves()` of the state it is applied to.
//!
//! ## Architecture
//!
//! - **Oracle as a Black Box**: the session only calls
//!   `SearchOracle::search(state, budget)` and keeps the returned tree for
//!   inspection. The bundled oracle is UCT over an arena tree.
//!
//! - **Persistent Data Structures**: the timeline is an `im::Vector`, so
//!   snapshots share structure.
//!
//! - **Single Transition in Flight**: a scoped busy guard covers each
//!   request from start to commit, oracle call included.
//!
//! ## Modules
//!
//! - `core`: teams, move tokens, rewards, the `GameState` contract, RNG
//! - `games`: grid, territory and abduction rule engines, `AnyState`, registry
//! - `mcts`: oracle boundary and the default UCT search
//! - `session`: timeline, busy guard, autoplay, configuration
//! - `error`: error taxonomy

pub mod core;
pub mod error;
pub mod games;
pub mod mcts;
pub mod session;

// Re-export commonly used types
pub use crate::core::{GameRng, GameState, Move, Reward, Team, TeamMap};

pub use crate::error::{ConfigError, GameError, OracleError, Result, SessionError};

pub use crate::games::{
    AbductionState, AnyState, GameKind, GameRegistry, GameSetup, GridState, TerritoryState,
};

pub use crate::mcts::{
    Mcts, MctsConfig, NodeStats, NodeView, SearchBudget, SearchOracle, SearchOutcome, SearchTree,
};

pub use crate::session::{
    AutoplayToggle, Rejection, Session, SessionConfig, SessionSnapshot, Timeline, Transition,
};
