//! Monte Carlo Tree Search oracle.
//!
//! ## Overview
//!
//! The session controller consumes search through one trait,
//! [`SearchOracle`]: `search(state, budget)` returns a legal move plus the
//! [`SearchTree`] it built. The bundled [`Mcts`] oracle is plain UCT:
//!
//! - **Arena tree**: nodes in a flat `Vec`, addressed by `NodeId`
//! - **Per-team rewards**: every node accumulates reward for both teams, and
//!   selection reads it from the side of the team moving at the parent
//! - **Random rollouts**: optionally depth-capped
//! - **Deterministic**: the RNG is derived from the configured seed and the
//!   root label, so equal positions get equal searches
//!
//! ## Usage
//!
//! ```rust
//! use mcts_arena::core::{GameState, Move};
//! use mcts_arena::games::GridState;
//! use mcts_arena::mcts::{Mcts, MctsConfig, SearchBudget, SearchOracle};
//!
//! let oracle = Mcts::new(MctsConfig::default());
//! let budget = SearchBudget::from_settings(1.414, 500, 0.0);
//!
//! let state = GridState::new();
//! let outcome = oracle.search(&state, &budget).unwrap();
//!
//! // Inspect the most visited replies.
//! for child in outcome.tree.root().children_by_visits().iter().take(3) {
//!     println!("{:?}: {} visits", child.mv(), child.visits());
//! }
//! # assert!(state.is_legal(&outcome.mv));
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;
pub mod view;

pub use config::{MctsConfig, SearchBudget, DEFAULT_EXPLORATION};
pub use node::{NodeId, SearchNode};
pub use policy::{RandomRollout, SelectionPolicy, UCB1};
pub use search::{Mcts, SearchOracle, SearchOutcome};
pub use stats::SearchStats;
pub use tree::{SearchTree, TreeStats};
pub use view::{NodeStats, NodeView};
