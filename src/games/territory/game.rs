//! Territory game implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::action::parse_fields;
use crate::core::state::ensure_legal;
use crate::core::{GameRng, GameState, Move, Reward, Team, TeamMap};
use crate::error::GameError;
use crate::games::GameKind;

/// Largest palette a board may use. Labels print one base-36 digit per cell.
pub const MAX_COLORS: u8 = 36;

/// Typed view of a territory move token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TerritoryMove {
    /// Colour to flood the mover's region with.
    pub color: u8,
}

impl TerritoryMove {
    /// Encode as a move token.
    #[must_use]
    pub fn encode(self) -> Move {
        Move::new(self.color.to_string())
    }

    /// Decode a move token. `None` if the token is not a colour index.
    #[must_use]
    pub fn decode(mv: &Move) -> Option<Self> {
        match parse_fields(mv.as_str())?.as_slice() {
            [color] => u8::try_from(*color).ok().map(|color| Self { color }),
            _ => None,
        }
    }
}

/// Builder for random territory boards.
#[derive(Clone, Debug)]
pub struct TerritoryBuilder {
    rows: usize,
    cols: usize,
    colors: u8,
}

impl Default for TerritoryBuilder {
    fn default() -> Self {
        Self {
            rows: 7,
            cols: 7,
            colors: 6,
        }
    }
}

impl TerritoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn cols(mut self, cols: usize) -> Self {
        self.cols = cols;
        self
    }

    pub fn colors(mut self, colors: u8) -> Self {
        self.colors = colors;
        self
    }

    /// Deal a random board. Team A moves first.
    ///
    /// The two anchors never start on the same colour.
    pub fn build(self, rng: &mut GameRng) -> Result<TerritoryState, GameError> {
        validate_shape(self.rows, self.cols, self.colors)?;

        let size = self.rows * self.cols;
        let mut board: Vec<u8> = (0..size)
            .map(|_| rng.gen_range_usize(0..self.colors as usize) as u8)
            .collect();
        if board[0] == board[size - 1] {
            board[size - 1] = (board[size - 1] + 1) % self.colors;
        }

        Ok(TerritoryState {
            rows: self.rows,
            cols: self.cols,
            colors: self.colors,
            board: board.into(),
            team: Team::A,
        })
    }
}

fn validate_shape(rows: usize, cols: usize, colors: u8) -> Result<(), GameError> {
    let invalid = |reason: String| GameError::InvalidSetup {
        game: GameKind::Territory,
        reason,
    };
    if rows == 0 || cols == 0 || rows * cols < 2 {
        return Err(invalid(format!("board {rows}x{cols} needs at least two cells")));
    }
    if colors < 2 {
        return Err(invalid(format!("palette of {colors} colours needs at least two")));
    }
    if colors > MAX_COLORS {
        return Err(invalid(format!(
            "palette of {colors} colours exceeds the limit of {MAX_COLORS}"
        )));
    }
    Ok(())
}

/// Territory game state.
///
/// The board is shared behind an `Arc`; every move builds a new one.
/// Deserializing goes through [`TerritoryState::from_board`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTerritoryState")]
pub struct TerritoryState {
    rows: usize,
    cols: usize,
    colors: u8,
    board: Arc<[u8]>,
    team: Team,
}

/// Unchecked wire form of a [`TerritoryState`].
#[derive(Deserialize)]
struct RawTerritoryState {
    rows: usize,
    cols: usize,
    colors: u8,
    board: Vec<u8>,
    team: Team,
}

impl TryFrom<RawTerritoryState> for TerritoryState {
    type Error = GameError;

    fn try_from(raw: RawTerritoryState) -> Result<Self, Self::Error> {
        Self::from_board(raw.rows, raw.cols, raw.colors, raw.board, raw.team)
    }
}

impl TerritoryState {
    /// Build a position from an explicit board.
    pub fn from_board(
        rows: usize,
        cols: usize,
        colors: u8,
        board: Vec<u8>,
        team: Team,
    ) -> Result<Self, GameError> {
        validate_shape(rows, cols, colors)?;
        let invalid = |reason: String| GameError::InvalidSetup {
            game: GameKind::Territory,
            reason,
        };
        if board.len() != rows * cols {
            return Err(invalid(format!(
                "expected {} cells, got {}",
                rows * cols,
                board.len()
            )));
        }
        if let Some(bad) = board.iter().find(|&&c| c >= colors) {
            return Err(invalid(format!("colour {bad} outside palette of {colors}")));
        }

        Ok(Self {
            rows,
            cols,
            colors,
            board: board.into(),
            team,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Palette size.
    #[must_use]
    pub fn colors(&self) -> u8 {
        self.colors
    }

    /// Cell colours, row-major.
    #[must_use]
    pub fn board(&self) -> &[u8] {
        &self.board
    }

    /// Anchor cell of a team.
    #[must_use]
    pub fn anchor(&self, team: Team) -> usize {
        match team {
            Team::A => 0,
            Team::B => self.board.len() - 1,
        }
    }

    /// Colour currently held by a team's region.
    #[must_use]
    pub fn anchor_color(&self, team: Team) -> u8 {
        self.board[self.anchor(team)]
    }

    /// Cells of a team's connected region, in visit order.
    #[must_use]
    pub fn region(&self, team: Team) -> Vec<usize> {
        let start = self.anchor(team);
        let color = self.board[start];
        let mut seen = vec![false; self.board.len()];
        let mut stack = vec![start];
        let mut cells = Vec::new();
        seen[start] = true;

        while let Some(cell) = stack.pop() {
            cells.push(cell);
            for next in self.neighbors(cell) {
                if !seen[next] && self.board[next] == color {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        cells
    }

    /// Size of each team's region.
    #[must_use]
    pub fn region_sizes(&self) -> TeamMap<usize> {
        TeamMap::new(|team| self.region(team).len())
    }

    /// Four-way neighbours of a cell.
    fn neighbors(&self, cell: usize) -> impl Iterator<Item = usize> {
        let (rows, cols) = (self.rows, self.cols);
        let (row, col) = (cell / cols, cell % cols);
        [
            (row > 0).then(|| cell - cols),
            (row + 1 < rows).then(|| cell + cols),
            (col > 0).then(|| cell - 1),
            (col + 1 < cols).then(|| cell + 1),
        ]
        .into_iter()
        .flatten()
    }

    /// Recolour the region containing `start` by four-way flood fill.
    fn flood_fill(&self, board: &mut [u8], start: usize, new_color: u8) {
        let old_color = board[start];
        if old_color == new_color {
            return;
        }
        let mut stack = vec![start];
        while let Some(cell) = stack.pop() {
            if board[cell] != old_color {
                continue;
            }
            board[cell] = new_color;
            stack.extend(self.neighbors(cell).filter(|&n| board[n] == old_color));
        }
    }

    fn active_colors(&self) -> [u8; 2] {
        [self.anchor_color(Team::A), self.anchor_color(Team::B)]
    }
}

impl GameState for TerritoryState {
    fn current_team(&self) -> Team {
        self.team
    }

    fn legal_moves(&self) -> Vec<Move> {
        let mut present = vec![false; self.colors as usize];
        for &color in self.board.iter() {
            present[color as usize] = true;
        }
        let active = self.active_colors();

        (0..self.colors)
            .filter(|c| present[*c as usize] && !active.contains(c))
            .map(|color| TerritoryMove { color }.encode())
            .collect()
    }

    fn make_move(&self, mv: &Move) -> Result<Self, GameError> {
        ensure_legal(self, mv)?;
        let TerritoryMove { color } =
            TerritoryMove::decode(mv).ok_or_else(|| GameError::IllegalMove {
                token: mv.to_string(),
                label: self.label(),
            })?;

        let mut board = self.board.to_vec();
        self.flood_fill(&mut board, self.anchor(self.team), color);

        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            colors: self.colors,
            board: board.into(),
            team: self.team.other(),
        })
    }

    fn is_terminal(&self) -> bool {
        let active = self.active_colors();
        self.board.iter().all(|c| active.contains(c))
    }

    fn reward(&self) -> Result<Reward, GameError> {
        if !self.is_terminal() {
            return Err(GameError::NotTerminal { label: self.label() });
        }
        let total = self.board.len() as f64;
        let sizes = self.region_sizes();
        Ok(Reward::Share(TeamMap::new(|team| sizes[team] as f64 / total)))
    }

    fn label(&self) -> String {
        let mut out = String::with_capacity(self.board.len() + self.rows + 2);
        out.push_str(self.team_label(self.team));
        out.push(':');
        for (i, color) in self.board.iter().enumerate() {
            if i > 0 && i % self.cols == 0 {
                out.push('/');
            }
            out.push(char::from_digit(u32::from(*color), 36).unwrap_or('?'));
        }
        out
    }

    fn team_label(&self, team: Team) -> &'static str {
        match team {
            Team::A => "1",
            Team::B => "2",
        }
    }
}

impl TryFrom<crate::games::AnyState> for TerritoryState {
    type Error = GameError;

    fn try_from(state: crate::games::AnyState) -> Result<Self, Self::Error> {
        match state {
            crate::games::AnyState::Territory(territory) => Ok(territory),
            other => Err(GameError::VariantMismatch {
                expected: GameKind::Territory,
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 0 1
    // 2 1 1
    // 2 3 3
    fn small() -> TerritoryState {
        TerritoryState::from_board(3, 3, 4, vec![0, 0, 1, 2, 1, 1, 2, 3, 3], Team::A).unwrap()
    }

    #[test]
    fn test_random_board_anchors_differ() {
        for seed in 0..50 {
            let state = TerritoryBuilder::new().build(&mut GameRng::new(seed)).unwrap();
            assert_ne!(state.anchor_color(Team::A), state.anchor_color(Team::B));
            assert_eq!(state.board().len(), 49);
            assert!(state.board().iter().all(|&c| c < 6));
        }
    }

    #[test]
    fn test_builder_rejects_degenerate_shapes() {
        let mut rng = GameRng::new(1);
        assert!(TerritoryBuilder::new().rows(1).cols(1).build(&mut rng).is_err());
        assert!(TerritoryBuilder::new().colors(1).build(&mut rng).is_err());
        assert!(TerritoryBuilder::new().colors(MAX_COLORS + 1).build(&mut rng).is_err());
        assert!(TerritoryBuilder::new().colors(MAX_COLORS).build(&mut rng).is_ok());
    }

    #[test]
    fn test_wide_palette_labels_stay_distinct() {
        assert!(TerritoryState::from_board(2, 2, 40, vec![0, 36, 0, 1], Team::A).is_err());

        let high = TerritoryState::from_board(2, 2, 36, vec![0, 35, 0, 1], Team::A).unwrap();
        let lower = TerritoryState::from_board(2, 2, 36, vec![0, 34, 0, 1], Team::A).unwrap();
        assert_eq!(high.label(), "1:0z/01");
        assert_eq!(lower.label(), "1:0y/01");
        assert_ne!(high.label(), lower.label());
    }

    #[test]
    fn test_deserialize_validates_board() {
        let bad_color = r#"{"rows":2,"cols":2,"colors":2,"board":[0,5,1,1],"team":"A"}"#;
        assert!(serde_json::from_str::<TerritoryState>(bad_color).is_err());

        let short = r#"{"rows":2,"cols":2,"colors":2,"board":[0,1,1],"team":"A"}"#;
        assert!(serde_json::from_str::<TerritoryState>(short).is_err());

        let state = small();
        let json = serde_json::to_string(&state).unwrap();
        let back: TerritoryState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.legal_moves(), state.legal_moves());
    }

    #[test]
    fn test_from_board_validation() {
        assert!(TerritoryState::from_board(2, 2, 3, vec![0, 1, 2], Team::A).is_err());
        assert!(TerritoryState::from_board(2, 2, 3, vec![0, 1, 2, 3], Team::A).is_err());
    }

    #[test]
    fn test_regions() {
        let state = small();
        let mut a = state.region(Team::A);
        a.sort_unstable();
        assert_eq!(a, vec![0, 1]);
        let mut b = state.region(Team::B);
        b.sort_unstable();
        assert_eq!(b, vec![7, 8]);
    }

    #[test]
    fn test_legal_moves_exclude_anchor_colors() {
        let state = small();
        let moves: Vec<_> = state.legal_moves().iter().map(|m| m.to_string()).collect();
        assert_eq!(moves, vec!["1", "2"]);
        assert!(state.make_move(&Move::from("3")).is_err());
        assert!(state.make_move(&Move::from("0")).is_err());
    }

    #[test]
    fn test_flood_fill_absorbs_neighbors() {
        let state = small();
        let next = state.make_move(&Move::from("1")).unwrap();

        // 1 1 1 / 2 1 1 / 2 3 3
        assert_eq!(next.board(), &[1, 1, 1, 2, 1, 1, 2, 3, 3]);
        assert_eq!(next.region(Team::A).len(), 5);
        assert_eq!(next.current_team(), Team::B);
        assert_eq!(state.board(), &[0, 0, 1, 2, 1, 1, 2, 3, 3]);
    }

    #[test]
    fn test_terminal_and_reward() {
        // 0 0 1 / 0 1 1 / 0 1 1 : only anchor colours left
        let state =
            TerritoryState::from_board(3, 3, 3, vec![0, 0, 1, 0, 1, 1, 0, 1, 1], Team::B).unwrap();
        assert!(state.is_terminal());
        assert!(state.legal_moves().is_empty());

        match state.reward().unwrap() {
            Reward::Share(shares) => {
                assert!((shares[Team::A] - 4.0 / 9.0).abs() < 1e-9);
                assert!((shares[Team::B] - 5.0 / 9.0).abs() < 1e-9);
            }
            other => panic!("unexpected reward {other:?}"),
        }
    }

    #[test]
    fn test_reward_counts_connected_region_only() {
        // 0 1 0 / 1 1 1 / 0 1 1 : the stray 0 cells are not A's region
        let state =
            TerritoryState::from_board(3, 3, 2, vec![0, 1, 0, 1, 1, 1, 0, 1, 1], Team::A).unwrap();
        assert!(state.is_terminal());
        let shares = state.reward().unwrap().by_team();
        assert!((shares[Team::A] - 1.0 / 9.0).abs() < 1e-9);
        assert!((shares[Team::B] - 6.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_label() {
        assert_eq!(small().label(), "1:001/211/233");
    }
}
