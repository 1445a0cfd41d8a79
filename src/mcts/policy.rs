//! MCTS policies for selection and simulation.
//!
//! - `SelectionPolicy`: which expanded child to descend into (UCB1)
//! - `RandomRollout`: how a newly expanded leaf is scored

use crate::core::{GameRng, GameState, TeamMap};
use crate::error::GameError;

use super::node::NodeId;
use super::tree::SearchTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Pick a child of `parent`. `None` if it has no children.
    fn select(&self, tree: &SearchTree, parent: NodeId, exploration: f64) -> Option<NodeId>;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Scores each child from the point of view of the team moving at the
/// parent: Q(child) + c * sqrt(ln(N) / n(child)). Unvisited children win.
#[derive(Clone, Copy, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn select(&self, tree: &SearchTree, parent: NodeId, exploration: f64) -> Option<NodeId> {
        let node = tree.get(parent);
        let team = node.to_move;
        let ln_parent = f64::from(node.visits.max(1)).ln();

        node.children
            .iter()
            .map(|&id| {
                let child = tree.get(id);
                let score = if child.visits == 0 {
                    f64::INFINITY
                } else {
                    child.mean_reward(team)
                        + exploration * (ln_parent / f64::from(child.visits)).sqrt()
                };
                (id, score)
            })
            .fold(None, |best: Option<(NodeId, f64)>, (id, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((id, score)),
            })
            .map(|(id, _)| id)
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Random playout policy.
///
/// Plays uniformly random legal moves until terminal or the depth cap.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomRollout {
    /// Maximum plies (0 = unlimited).
    pub max_depth: u32,
}

impl RandomRollout {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Play out from `state`, returning the reward per team.
    ///
    /// A playout cut off by the depth cap scores zero for both teams.
    pub fn simulate<S: GameState>(
        &self,
        state: &S,
        rng: &mut GameRng,
    ) -> Result<TeamMap<f64>, GameError> {
        let mut current = state.clone();
        let mut depth = 0;

        loop {
            if current.is_terminal() {
                return Ok(current.reward()?.by_team());
            }
            if self.max_depth > 0 && depth >= self.max_depth {
                return Ok(TeamMap::with_value(0.0));
            }

            let moves = current.legal_moves();
            let Some(mv) = rng.choose(&moves) else {
                return Ok(TeamMap::with_value(0.0));
            };
            current = current.make_move(mv)?;
            depth += 1;
        }
    }
}
