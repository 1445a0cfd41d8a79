//! Rule engines and the closed union over them.
//!
//! Each variant lives in its own module and implements [`GameState`] for its
//! own value type. `AnyState` is the tagged union the session controller
//! works with; it delegates every contract method to the wrapped variant, so
//! adding a variant is a compile error everywhere a match is incomplete.

pub mod abduction;
pub mod grid;
mod registry;
pub mod territory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Move, Reward, Team};
use crate::error::GameError;

pub use abduction::AbductionState;
pub use grid::GridState;
pub use registry::{AbductionSetup, GameEntry, GameRegistry, GameSetup, TerritorySetup};
pub use territory::TerritoryState;

/// Tag naming a game variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    #[default]
    Grid,
    Territory,
    Abduction,
}

impl GameKind {
    /// Every variant, in registry order.
    pub const ALL: [GameKind; 3] = [GameKind::Grid, GameKind::Territory, GameKind::Abduction];
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameKind::Grid => "Grid",
            GameKind::Territory => "Territory",
            GameKind::Abduction => "Abduction",
        };
        f.write_str(name)
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" | "tictactoe" | "tic-tac-toe" => Ok(GameKind::Grid),
            "territory" | "filler" => Ok(GameKind::Territory),
            "abduction" | "onitama" => Ok(GameKind::Abduction),
            other => Err(format!("unknown game '{other}'")),
        }
    }
}

/// A state of any variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnyState {
    Grid(GridState),
    Territory(TerritoryState),
    Abduction(AbductionState),
}

impl AnyState {
    /// Variant tag of this state.
    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            AnyState::Grid(_) => GameKind::Grid,
            AnyState::Territory(_) => GameKind::Territory,
            AnyState::Abduction(_) => GameKind::Abduction,
        }
    }
}

macro_rules! delegate {
    ($self:ident, $state:ident => $body:expr) => {
        match $self {
            AnyState::Grid($state) => $body,
            AnyState::Territory($state) => $body,
            AnyState::Abduction($state) => $body,
        }
    };
}

impl GameState for AnyState {
    fn current_team(&self) -> Team {
        delegate!(self, s => s.current_team())
    }

    fn legal_moves(&self) -> Vec<Move> {
        delegate!(self, s => s.legal_moves())
    }

    fn make_move(&self, mv: &Move) -> Result<Self, GameError> {
        match self {
            AnyState::Grid(s) => s.make_move(mv).map(AnyState::Grid),
            AnyState::Territory(s) => s.make_move(mv).map(AnyState::Territory),
            AnyState::Abduction(s) => s.make_move(mv).map(AnyState::Abduction),
        }
    }

    fn is_terminal(&self) -> bool {
        delegate!(self, s => s.is_terminal())
    }

    fn reward(&self) -> Result<Reward, GameError> {
        delegate!(self, s => s.reward())
    }

    fn label(&self) -> String {
        delegate!(self, s => s.label())
    }

    fn team_label(&self, team: Team) -> &'static str {
        delegate!(self, s => s.team_label(team))
    }

    fn is_legal(&self, mv: &Move) -> bool {
        delegate!(self, s => s.is_legal(mv))
    }
}

impl From<GridState> for AnyState {
    fn from(state: GridState) -> Self {
        AnyState::Grid(state)
    }
}

impl From<TerritoryState> for AnyState {
    fn from(state: TerritoryState) -> Self {
        AnyState::Territory(state)
    }
}

impl From<AbductionState> for AnyState {
    fn from(state: AbductionState) -> Self {
        AnyState::Abduction(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("grid".parse::<GameKind>(), Ok(GameKind::Grid));
        assert_eq!("Filler".parse::<GameKind>(), Ok(GameKind::Territory));
        assert_eq!("ONITAMA".parse::<GameKind>(), Ok(GameKind::Abduction));
        assert!("chess".parse::<GameKind>().is_err());
    }

    #[test]
    fn test_any_state_delegates() {
        let state = AnyState::from(GridState::new());
        assert_eq!(state.kind(), GameKind::Grid);
        assert_eq!(state.team_label(Team::A), "X");

        let next = state.make_move(&Move::from("4")).unwrap();
        assert_eq!(next.kind(), GameKind::Grid);
        assert_eq!(next.current_team(), Team::B);
        assert_eq!(next.label(), "O:___/_X_/___");
        assert!(state.make_move(&Move::from("9")).is_err());
    }

    #[test]
    fn test_variant_mismatch() {
        let state = AnyState::from(GridState::new());
        let err = TerritoryState::try_from(state.clone()).unwrap_err();
        assert_eq!(
            err,
            GameError::VariantMismatch {
                expected: GameKind::Territory,
                found: GameKind::Grid,
            }
        );
        assert!(GridState::try_from(state).is_ok());
    }
}
