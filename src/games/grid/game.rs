//! Grid game implementation.

use serde::{Deserialize, Serialize};

use crate::core::action::parse_fields;
use crate::core::state::ensure_legal;
use crate::core::{GameState, Move, Reward, Team};
use crate::error::GameError;
use crate::games::GameKind;

const CELLS: usize = 9;

/// The eight winning lines.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Typed view of a grid move token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridMove {
    /// Target cell, row-major.
    pub cell: usize,
}

impl GridMove {
    /// Encode as a move token.
    #[must_use]
    pub fn encode(self) -> Move {
        Move::new(self.cell.to_string())
    }

    /// Decode a move token. `None` if the token is not a cell index.
    #[must_use]
    pub fn decode(mv: &Move) -> Option<Self> {
        match parse_fields(mv.as_str())?.as_slice() {
            [cell] if *cell < CELLS => Some(Self { cell: *cell }),
            _ => None,
        }
    }
}

/// Grid game state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridState {
    cells: [Option<Team>; CELLS],
    team: Team,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

impl GridState {
    /// Empty board, X to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
            team: Team::A,
        }
    }

    /// Build a position from explicit cells.
    pub fn from_cells(cells: [Option<Team>; CELLS], team: Team) -> Self {
        Self { cells, team }
    }

    /// Cell contents, row-major.
    #[must_use]
    pub fn cells(&self) -> &[Option<Team>; CELLS] {
        &self.cells
    }

    /// Team owning a complete line, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(team) if self.cells[b] == Some(team) && self.cells[c] == Some(team) => Some(team),
            _ => None,
        })
    }

    /// Whether every cell is taken.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    fn mark(team: Option<Team>) -> char {
        match team {
            Some(Team::A) => 'X',
            Some(Team::B) => 'O',
            None => '_',
        }
    }
}

impl GameState for GridState {
    fn current_team(&self) -> Team {
        self.team
    }

    fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(cell, _)| GridMove { cell }.encode())
            .collect()
    }

    fn make_move(&self, mv: &Move) -> Result<Self, GameError> {
        ensure_legal(self, mv)?;
        let GridMove { cell } = GridMove::decode(mv).ok_or_else(|| GameError::IllegalMove {
            token: mv.to_string(),
            label: self.label(),
        })?;

        let mut next = self.clone();
        next.cells[cell] = Some(self.team);
        next.team = self.team.other();
        Ok(next)
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    fn reward(&self) -> Result<Reward, GameError> {
        match self.winner() {
            Some(team) => Ok(Reward::Winner(team)),
            None if self.is_full() => Ok(Reward::Draw),
            None => Err(GameError::NotTerminal { label: self.label() }),
        }
    }

    fn label(&self) -> String {
        let mut out = String::with_capacity(14);
        out.push(Self::mark(Some(self.team)));
        out.push(':');
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 && i % 3 == 0 {
                out.push('/');
            }
            out.push(Self::mark(*cell));
        }
        out
    }

    fn team_label(&self, team: Team) -> &'static str {
        match team {
            Team::A => "X",
            Team::B => "O",
        }
    }
}

impl TryFrom<crate::games::AnyState> for GridState {
    type Error = GameError;

    fn try_from(state: crate::games::AnyState) -> Result<Self, Self::Error> {
        match state {
            crate::games::AnyState::Grid(grid) => Ok(grid),
            other => Err(GameError::VariantMismatch {
                expected: GameKind::Grid,
                found: other.kind(),
            }),
        }
    }
}
