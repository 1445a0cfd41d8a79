//! MCTS node structures.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Move, Team, TeamMap};

/// Index into the `SearchTree` node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A visited state in the search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move that led here from the parent (None for root).
    pub mv: Option<Move>,

    /// Label of the state this node stands for.
    pub label: String,

    /// Team to move in this state.
    pub to_move: Team,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Total visits through this node.
    pub visits: u32,

    /// Reward accumulated by each team over all visits.
    pub reward_by_team: TeamMap<f64>,

    /// Exact reward, set when the state is terminal.
    pub terminal_reward: Option<TeamMap<f64>>,

    /// Expanded children, in expansion order.
    pub children: SmallVec<[NodeId; 8]>,

    /// Legal moves not yet expanded.
    pub untried: Vec<Move>,
}

impl SearchNode {
    /// Create a node for a freshly reached state.
    pub fn new(
        parent: NodeId,
        mv: Option<Move>,
        label: String,
        to_move: Team,
        depth: u16,
        untried: Vec<Move>,
    ) -> Self {
        Self {
            parent,
            mv,
            label,
            to_move,
            depth,
            visits: 0,
            reward_by_team: TeamMap::with_value(0.0),
            terminal_reward: None,
            children: SmallVec::new(),
            untried,
        }
    }

    /// Mark the node terminal with its exact reward.
    #[must_use]
    pub fn terminal(mut self, reward: TeamMap<f64>) -> Self {
        self.untried.clear();
        self.terminal_reward = Some(reward);
        self
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal_reward.is_some()
    }

    /// Whether every legal move has a child.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Mean reward for a team (0 before the first visit).
    #[must_use]
    pub fn mean_reward(&self, team: Team) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward_by_team[team] / f64::from(self.visits)
        }
    }

    /// Record one visit with the given per-team reward.
    pub fn record(&mut self, reward: &TeamMap<f64>) {
        self.visits += 1;
        for (team, total) in self.reward_by_team.iter_mut() {
            *total += reward[team];
        }
    }
}
