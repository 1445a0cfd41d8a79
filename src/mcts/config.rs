//! Search configuration: oracle knobs and per-call budgets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// UCB1 exploration constant used when a budget leaves it unset.
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Oracle-internal configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Random seed for rollouts and expansion order.
    /// Same seed and root state produce the same search.
    pub seed: u64,

    /// Maximum nodes to allocate in the tree.
    /// Bounds memory when the budget sets no other limit.
    pub max_nodes: usize,

    /// Maximum plies per rollout (0 = play to the end).
    /// A truncated rollout scores zero for both teams.
    pub rollout_depth: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_nodes: 100_000,
            rollout_depth: 0,
        }
    }
}

impl MctsConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }
}

/// Resource budget for one oracle call.
///
/// Every limit is independently optional. With neither `max_iterations` nor
/// `max_time` set, the search only stops at the node cap or once the whole
/// game tree has been expanded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchBudget {
    pub exploration_bias: Option<f64>,
    pub max_iterations: Option<u32>,
    pub max_time: Option<Duration>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::from_settings(1.414, 1000, 1.0)
    }
}

impl SearchBudget {
    /// A budget with every limit disabled.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            exploration_bias: None,
            max_iterations: None,
            max_time: None,
        }
    }

    /// Build a budget from raw user settings.
    ///
    /// A value that is not positive disables its limit; it never becomes 0.
    /// Values too large for a `Duration` saturate to `Duration::MAX`.
    #[must_use]
    pub fn from_settings(exploration_bias: f64, max_iterations: i64, max_time_secs: f64) -> Self {
        Self {
            exploration_bias: (exploration_bias > 0.0).then_some(exploration_bias),
            max_iterations: (max_iterations > 0)
                .then(|| u32::try_from(max_iterations).unwrap_or(u32::MAX)),
            max_time: (max_time_secs > 0.0).then(|| {
                Duration::try_from_secs_f64(max_time_secs).unwrap_or(Duration::MAX)
            }),
        }
    }

    pub fn with_exploration(mut self, bias: f64) -> Self {
        self.exploration_bias = Some(bias);
        self
    }

    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn with_max_time(mut self, time: Duration) -> Self {
        self.max_time = Some(time);
        self
    }

    /// Exploration constant to search with.
    #[must_use]
    pub fn exploration(&self) -> f64 {
        self.exploration_bias.unwrap_or(DEFAULT_EXPLORATION)
    }
}
