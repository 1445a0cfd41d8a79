//! The game-state contract.
//!
//! Every rule engine implements `GameState` for an immutable value type.
//! Transitions never mutate: `make_move` takes `&self` and returns a fresh
//! state, so a history of states is just a list of values.
//!
//! ## Implementation Notes
//!
//! - `legal_moves`: deterministic order; empty only for terminal states
//!   (the abduction game substitutes pass moves for a dead end instead)
//! - `make_move`: must re-validate the token against `legal_moves`
//! - `reward`: only defined once `is_terminal` holds
//! - `label`: canonical text, equal for equal positions

use serde::{Deserialize, Serialize};

use super::action::Move;
use super::team::{Team, TeamMap};
use crate::error::GameError;

/// Final score of a terminal state.
///
/// Reward is typed per game: decisive games report a winner or a draw,
/// the territory game reports each team's share of the board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Reward {
    /// One team won.
    Winner(Team),
    /// Nobody won.
    Draw,
    /// Continuous per-team score in [0, 1].
    Share(TeamMap<f64>),
}

impl Reward {
    /// Reward from one team's perspective.
    ///
    /// Winner +1, loser -1, draw 0; shares are reported as-is.
    #[must_use]
    pub fn for_team(&self, team: Team) -> f64 {
        match self {
            Reward::Winner(winner) if *winner == team => 1.0,
            Reward::Winner(_) => -1.0,
            Reward::Draw => 0.0,
            Reward::Share(shares) => shares[team],
        }
    }

    /// Reward for both teams.
    #[must_use]
    pub fn by_team(&self) -> TeamMap<f64> {
        TeamMap::new(|team| self.for_team(team))
    }

    /// The winning team, if the reward is decisive.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        match self {
            Reward::Winner(team) => Some(*team),
            Reward::Draw => None,
            Reward::Share(shares) => {
                if shares[Team::A] > shares[Team::B] {
                    Some(Team::A)
                } else if shares[Team::B] > shares[Team::A] {
                    Some(Team::B)
                } else {
                    None
                }
            }
        }
    }
}

/// Contract implemented by every rule engine.
pub trait GameState: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Team to move next.
    fn current_team(&self) -> Team;

    /// All moves playable from exactly this state.
    fn legal_moves(&self) -> Vec<Move>;

    /// Successor state after `mv`.
    ///
    /// Fails with `GameError::IllegalMove` unless `mv` is currently legal.
    fn make_move(&self, mv: &Move) -> Result<Self, GameError>;

    /// Whether further play is meaningless.
    fn is_terminal(&self) -> bool;

    /// Final reward. Fails with `GameError::NotTerminal` before the end.
    fn reward(&self) -> Result<Reward, GameError>;

    /// Canonical textual signature of the position.
    fn label(&self) -> String;

    /// Display name of a team in this game.
    fn team_label(&self, team: Team) -> &'static str {
        match team {
            Team::A => "A",
            Team::B => "B",
        }
    }

    // === Convenience Methods ===

    /// Check whether `mv` is currently legal.
    fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves().iter().any(|m| m == mv)
    }
}

/// Reject `mv` unless it is a member of `state.legal_moves()`.
pub(crate) fn ensure_legal<S: GameState>(state: &S, mv: &Move) -> Result<(), GameError> {
    if state.is_legal(mv) {
        Ok(())
    } else {
        Err(GameError::IllegalMove {
            token: mv.to_string(),
            label: state.label(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_winner() {
        let reward = Reward::Winner(Team::B);
        assert_eq!(reward.for_team(Team::B), 1.0);
        assert_eq!(reward.for_team(Team::A), -1.0);
        assert_eq!(reward.winner(), Some(Team::B));
    }

    #[test]
    fn test_reward_draw() {
        let reward = Reward::Draw;
        assert_eq!(reward.by_team(), TeamMap::with_value(0.0));
        assert_eq!(reward.winner(), None);
    }

    #[test]
    fn test_reward_share() {
        let reward = Reward::Share(TeamMap::new(|t| if t == Team::A { 0.6 } else { 0.4 }));
        assert_eq!(reward.for_team(Team::A), 0.6);
        assert_eq!(reward.winner(), Some(Team::A));

        let even = Reward::Share(TeamMap::with_value(0.5));
        assert_eq!(even.winner(), None);
    }
}
