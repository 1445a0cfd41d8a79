//! Team identification and per-team data storage.
//!
//! ## Team
//!
//! Every game in the arena is a two-sided contest, so a team is one of two
//! fixed sides. Which side moves first is decided by each game.
//!
//! ## TeamMap
//!
//! Fixed two-slot storage indexed by `Team` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Side A (X in the grid game, 1 in territory, Red in abduction).
    A,
    /// Side B (O in the grid game, 2 in territory, Blue in abduction).
    B,
}

impl Team {
    /// Both teams, A first.
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    /// The opposing team.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Slot index (A = 0, B = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::A => write!(f, "Team A"),
            Team::B => write!(f, "Team B"),
        }
    }
}

/// Per-team data storage.
///
/// ## Example
///
/// ```
/// use mcts_arena::core::{Team, TeamMap};
///
/// let mut score: TeamMap<f64> = TeamMap::with_value(0.0);
/// score[Team::B] += 1.5;
/// assert_eq!(score[Team::A], 0.0);
/// assert_eq!(score[Team::B], 1.5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: [T; 2],
}

impl<T> TeamMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Team) -> T) -> Self {
        Self {
            data: [factory(Team::A), factory(Team::B)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Iterate over (Team, &T) pairs, A first.
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        Team::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Team, &mut T) pairs, A first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Team, &mut T)> {
        Team::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Combine two maps slot by slot.
    pub fn zip_with<U, R>(&self, other: &TeamMap<U>, f: impl Fn(&T, &U) -> R) -> TeamMap<R> {
        TeamMap::new(|team| f(&self[team], &other[team]))
    }
}

impl<T> Index<Team> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: Team) -> &Self::Output {
        &self.data[team.index()]
    }
}

impl<T> IndexMut<Team> for TeamMap<T> {
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        &mut self.data[team.index()]
    }
}
