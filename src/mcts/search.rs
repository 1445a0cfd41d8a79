//! Core MCTS search algorithm and the oracle boundary.
//!
//! The session controller only sees [`SearchOracle`]: give it a state and a
//! budget, get back a legal move and the tree that produced it. [`Mcts`] is
//! the default implementation, plain UCT over immutable game states.

use std::time::Instant;

use tracing::debug;

use crate::core::{GameRng, GameState, Move, TeamMap};
use crate::error::{GameError, OracleError};

use super::config::{MctsConfig, SearchBudget};
use super::node::{NodeId, SearchNode};
use super::policy::{RandomRollout, SelectionPolicy, UCB1};
use super::stats::SearchStats;
use super::tree::SearchTree;

/// Result of one oracle call.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Chosen move, legal in the searched state.
    pub mv: Move,
    /// Tree built during the search.
    pub tree: SearchTree,
    pub stats: SearchStats,
}

/// A move-proposing search component.
///
/// Implementations must return a member of `state.legal_moves()`.
pub trait SearchOracle<S: GameState>: Send + Sync {
    fn search(&self, state: &S, budget: &SearchBudget) -> Result<SearchOutcome, OracleError>;
}

/// UCT search with random rollouts.
///
/// ## Example
///
/// ```
/// use mcts_arena::core::GameState;
/// use mcts_arena::games::GridState;
/// use mcts_arena::mcts::{Mcts, MctsConfig, SearchBudget, SearchOracle};
///
/// let oracle = Mcts::new(MctsConfig::default().with_seed(7));
/// let state = GridState::new();
/// let outcome = oracle
///     .search(&state, &SearchBudget::unbounded().with_max_iterations(200))
///     .unwrap();
///
/// assert!(state.is_legal(&outcome.mv));
/// assert_eq!(outcome.tree.root().visits(), 200);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Mcts<P: SelectionPolicy = UCB1> {
    config: MctsConfig,
    selection: P,
}

impl Mcts {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            selection: UCB1,
        }
    }
}

impl<P: SelectionPolicy> Mcts<P> {
    /// Swap in a different selection policy.
    pub fn with_selection<Q: SelectionPolicy>(self, selection: Q) -> Mcts<Q> {
        Mcts {
            config: self.config,
            selection,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    fn node_for<S: GameState>(
        state: &S,
        parent: NodeId,
        mv: Option<Move>,
        depth: u16,
    ) -> Result<SearchNode, GameError> {
        let node = SearchNode::new(
            parent,
            mv,
            state.label(),
            state.current_team(),
            depth,
            state.legal_moves(),
        );
        if state.is_terminal() {
            Ok(node.terminal(state.reward()?.by_team()))
        } else {
            Ok(node)
        }
    }

    /// Single iteration: select, expand, simulate, backpropagate.
    fn iteration<S: GameState>(
        &self,
        tree: &mut SearchTree,
        root: &S,
        exploration: f64,
        rng: &mut GameRng,
        stats: &mut SearchStats,
    ) -> Result<(), GameError> {
        let rollout = RandomRollout::new(self.config.rollout_depth);
        let mut current = tree.root_id();
        let mut state = root.clone();

        // === SELECTION ===
        loop {
            let node = tree.get(current);
            if node.is_terminal() || !node.is_fully_expanded() {
                break;
            }
            let Some(next) = self.selection.select(tree, current, exploration) else {
                break;
            };
            if let Some(mv) = &tree.get(next).mv {
                state = state.make_move(mv)?;
            }
            current = next;
        }

        // === EXPANSION ===
        let untried = tree.get(current).untried.len();
        if untried > 0 && tree.len() < self.config.max_nodes {
            let mv = tree.take_untried(current, rng.gen_range_usize(0..untried));
            state = state.make_move(&mv)?;
            let depth = tree.get(current).depth + 1;
            let child = Self::node_for(&state, current, Some(mv), depth)?;
            current = tree.attach(current, child);
            stats.nodes_expanded += 1;
            stats.max_depth = stats.max_depth.max(depth);
        }

        // === SIMULATION ===
        let reward: TeamMap<f64> = match tree.get(current).terminal_reward {
            Some(reward) => reward,
            None => {
                stats.simulations += 1;
                let mut sim_rng = rng.fork();
                rollout.simulate(&state, &mut sim_rng)?
            }
        };

        // === BACKPROPAGATION ===
        let mut id = current;
        while !id.is_none() {
            let node = tree.get_mut(id);
            node.record(&reward);
            id = node.parent;
        }
        Ok(())
    }
}

impl<S: GameState, P: SelectionPolicy> SearchOracle<S> for Mcts<P> {
    fn search(&self, state: &S, budget: &SearchBudget) -> Result<SearchOutcome, OracleError> {
        let start = Instant::now();
        let label = state.label();
        if state.is_terminal() || state.legal_moves().is_empty() {
            return Err(OracleError::NoLegalMoves { label });
        }

        let mut rng = GameRng::new(self.config.seed).for_context(&label);
        let mut tree = SearchTree::new(Self::node_for(state, NodeId::NONE, None, 0)?);
        let mut stats = SearchStats::new();
        let exploration = budget.exploration();

        loop {
            if budget.max_iterations.is_some_and(|max| stats.iterations >= max) {
                break;
            }
            if budget.max_time.is_some_and(|max| start.elapsed() >= max) {
                break;
            }
            // Without an iteration limit, stop once the tree cannot grow.
            if stats.iterations > 0
                && budget.max_iterations.is_none()
                && (tree.is_complete() || tree.len() >= self.config.max_nodes)
            {
                break;
            }
            self.iteration(&mut tree, state, exploration, &mut rng, &mut stats)?;
            stats.iterations += 1;
        }
        stats.time_us = start.elapsed().as_micros() as u64;

        let root = tree.root();
        let best = root
            .children()
            .fold(None, |best: Option<(u32, &Move)>, child| {
                let visits = child.visits();
                match (best, child.mv()) {
                    (Some((top, _)), _) if top >= visits => best,
                    (_, Some(mv)) => Some((visits, mv)),
                    _ => best,
                }
            })
            .map(|(_, mv)| mv.clone());

        // A zero-iteration budget still has to answer with something legal.
        let mv = match best {
            Some(mv) => mv,
            None => tree
                .get(tree.root_id())
                .untried
                .first()
                .cloned()
                .ok_or_else(|| OracleError::NoLegalMoves { label: label.clone() })?,
        };

        debug!(
            state = %label,
            chosen = %mv,
            iterations = stats.iterations,
            nodes = tree.len(),
            simulations = stats.simulations,
            max_depth = stats.max_depth,
            time_us = stats.time_us,
            "search finished"
        );

        Ok(SearchOutcome { mv, tree, stats })
    }
}
