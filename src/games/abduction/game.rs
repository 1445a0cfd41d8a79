//! Card-abduction game implementation.

use serde::{Deserialize, Serialize};

use super::cards::{card_at, CardSet};
use crate::core::action::parse_fields;
use crate::core::state::ensure_legal;
use crate::core::{GameRng, GameState, Move, Reward, Team, TeamMap};
use crate::error::GameError;
use crate::games::GameKind;

/// Board side length.
pub const SIZE: usize = 5;
const CELLS: usize = SIZE * SIZE;

/// Default number of plies after which the game is a draw.
pub const DEFAULT_MOVE_CAP: u32 = 1000;

/// A piece on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    Student(Team),
    Master(Team),
}

impl Piece {
    #[must_use]
    pub fn team(self) -> Team {
        match self {
            Piece::Student(team) | Piece::Master(team) => team,
        }
    }

    fn symbol(self) -> char {
        match self {
            Piece::Master(Team::A) => 'R',
            Piece::Student(Team::A) => 'r',
            Piece::Master(Team::B) => 'B',
            Piece::Student(Team::B) => 'b',
        }
    }
}

/// Typed view of an abduction move token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbductionMove {
    /// Move a piece with a card: `"card,from,to"`.
    Step { card: u8, from: usize, to: usize },
    /// Give up a card without moving: `"pass card"`.
    Pass { card: u8 },
}

impl AbductionMove {
    /// The card played by this move.
    #[must_use]
    pub fn card(self) -> u8 {
        match self {
            AbductionMove::Step { card, .. } | AbductionMove::Pass { card } => card,
        }
    }

    /// Encode as a move token.
    #[must_use]
    pub fn encode(self) -> Move {
        match self {
            AbductionMove::Step { card, from, to } => Move::new(format!("{card},{from},{to}")),
            AbductionMove::Pass { card } => Move::new(format!("pass {card}")),
        }
    }

    /// Decode a move token. `None` if it matches neither grammar.
    #[must_use]
    pub fn decode(mv: &Move) -> Option<Self> {
        if let Some(rest) = mv.as_str().strip_prefix("pass ") {
            return match parse_fields(rest)?.as_slice() {
                [card] => u8::try_from(*card).ok().map(|card| AbductionMove::Pass { card }),
                _ => None,
            };
        }
        match parse_fields(mv.as_str())?.as_slice() {
            [card, from, to] if *from < CELLS && *to < CELLS => Some(AbductionMove::Step {
                card: u8::try_from(*card).ok()?,
                from: *from,
                to: *to,
            }),
            _ => None,
        }
    }
}

/// Builder for freshly dealt games.
#[derive(Clone, Debug)]
pub struct AbductionBuilder {
    card_set: CardSet,
    move_cap: u32,
}

impl Default for AbductionBuilder {
    fn default() -> Self {
        Self {
            card_set: CardSet::All,
            move_cap: DEFAULT_MOVE_CAP,
        }
    }
}

impl AbductionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card_set(mut self, card_set: CardSet) -> Self {
        self.card_set = card_set;
        self
    }

    pub fn move_cap(mut self, move_cap: u32) -> Self {
        self.move_cap = move_cap;
        self
    }

    /// Deal five cards and set up the starting position.
    ///
    /// The reserve card decides who opens.
    pub fn build(self, rng: &mut GameRng) -> AbductionState {
        let mut deck = self.card_set.indices();
        rng.shuffle(&mut deck);

        let reserve = deck[4];
        let team = card_at(reserve).map_or(Team::A, |c| c.first);

        AbductionState {
            board: AbductionState::starting_board(),
            team,
            hands: TeamMap::new(|t| match t {
                Team::A => [deck[0], deck[1]],
                Team::B => [deck[2], deck[3]],
            }),
            reserve,
            plies: 0,
            move_cap: self.move_cap,
        }
    }
}

/// Card-abduction game state.
///
/// Deserializing goes through [`AbductionState::from_parts`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAbductionState")]
pub struct AbductionState {
    board: [Option<Piece>; CELLS],
    team: Team,
    hands: TeamMap<[u8; 2]>,
    reserve: u8,
    plies: u32,
    move_cap: u32,
}

/// Unchecked wire form of an [`AbductionState`].
#[derive(Deserialize)]
struct RawAbductionState {
    board: [Option<Piece>; CELLS],
    team: Team,
    hands: TeamMap<[u8; 2]>,
    reserve: u8,
    plies: u32,
    move_cap: u32,
}

impl TryFrom<RawAbductionState> for AbductionState {
    type Error = GameError;

    fn try_from(raw: RawAbductionState) -> Result<Self, Self::Error> {
        if raw.move_cap == 0 {
            return Err(GameError::InvalidSetup {
                game: GameKind::Abduction,
                reason: "move cap must be positive".to_string(),
            });
        }
        Self::from_parts(raw.board, raw.team, raw.hands, raw.reserve, raw.plies)
            .map(|state| state.with_move_cap(raw.move_cap))
    }
}

impl AbductionState {
    /// Cell a team's master starts on; the opposing master wins by reaching it.
    #[must_use]
    pub const fn temple(team: Team) -> usize {
        match team {
            Team::A => 22,
            Team::B => 2,
        }
    }

    /// Team B on row 0, Team A on row 4, masters in the middle.
    #[must_use]
    pub fn starting_board() -> [Option<Piece>; CELLS] {
        let mut board = [None; CELLS];
        for col in 0..SIZE {
            let (b, a) = if col == 2 {
                (Piece::Master(Team::B), Piece::Master(Team::A))
            } else {
                (Piece::Student(Team::B), Piece::Student(Team::A))
            };
            board[col] = Some(b);
            board[CELLS - SIZE + col] = Some(a);
        }
        board
    }

    /// Build a position from explicit parts.
    ///
    /// The five card indices must be distinct members of the deck.
    pub fn from_parts(
        board: [Option<Piece>; CELLS],
        team: Team,
        hands: TeamMap<[u8; 2]>,
        reserve: u8,
        plies: u32,
    ) -> Result<Self, GameError> {
        let mut cards = vec![
            hands[Team::A][0],
            hands[Team::A][1],
            hands[Team::B][0],
            hands[Team::B][1],
            reserve,
        ];
        if let Some(bad) = cards.iter().find(|&&c| card_at(c).is_none()) {
            return Err(GameError::InvalidSetup {
                game: GameKind::Abduction,
                reason: format!("card {bad} is not in the deck"),
            });
        }
        cards.sort_unstable();
        cards.dedup();
        if cards.len() != 5 {
            return Err(GameError::InvalidSetup {
                game: GameKind::Abduction,
                reason: "the five dealt cards must be distinct".to_string(),
            });
        }

        Ok(Self {
            board,
            team,
            hands,
            reserve,
            plies,
            move_cap: DEFAULT_MOVE_CAP,
        })
    }

    /// Replace the draw cap.
    #[must_use]
    pub fn with_move_cap(mut self, move_cap: u32) -> Self {
        self.move_cap = move_cap;
        self
    }

    #[must_use]
    pub fn board(&self) -> &[Option<Piece>; CELLS] {
        &self.board
    }

    /// Cards held by a team.
    #[must_use]
    pub fn hand(&self, team: Team) -> [u8; 2] {
        self.hands[team]
    }

    /// The neutral card waiting to be picked up.
    #[must_use]
    pub fn reserve(&self) -> u8 {
        self.reserve
    }

    /// Plies played so far, passes included.
    #[must_use]
    pub fn plies(&self) -> u32 {
        self.plies
    }

    #[must_use]
    pub fn move_cap(&self) -> u32 {
        self.move_cap
    }

    /// Destination of `offset` applied from `from` by `team`, if on the board.
    ///
    /// Team A adds the offset, Team B subtracts it.
    #[must_use]
    pub fn destination(team: Team, from: usize, offset: (i8, i8)) -> Option<usize> {
        let (dr, dc) = match team {
            Team::A => (offset.0 as isize, offset.1 as isize),
            Team::B => (-(offset.0 as isize), -(offset.1 as isize)),
        };
        let row = (from / SIZE) as isize + dr;
        let col = (from % SIZE) as isize + dc;
        if (0..SIZE as isize).contains(&row) && (0..SIZE as isize).contains(&col) {
            Some(row as usize * SIZE + col as usize)
        } else {
            None
        }
    }

    /// Winning team, if either win condition holds.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        Team::ALL.into_iter().find(|&team| {
            let opponent = team.other();
            let opponent_master_gone = !self.board.contains(&Some(Piece::Master(opponent)));
            let reached_temple = self.board[Self::temple(opponent)] == Some(Piece::Master(team));
            opponent_master_gone || reached_temple
        })
    }

    /// Whether the draw cap has been reached.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.plies >= self.move_cap
    }

    /// Ordinary moves for the side to move, in hand/cell/offset order.
    fn steps(&self) -> Vec<AbductionMove> {
        let team = self.team;
        let mut steps = Vec::new();
        for card in self.hands[team] {
            let Some(def) = card_at(card) else { continue };
            for from in 0..CELLS {
                if self.board[from].map(Piece::team) != Some(team) {
                    continue;
                }
                for &offset in def.offsets {
                    let Some(to) = Self::destination(team, from, offset) else { continue };
                    if self.board[to].map(Piece::team) != Some(team) {
                        steps.push(AbductionMove::Step { card, from, to });
                    }
                }
            }
        }
        steps
    }

    /// Hand the played card to the reserve and pick up the old reserve card.
    fn rotate_cards(&self, next: &mut Self, card: u8) {
        let hand = &mut next.hands[self.team];
        if let Some(slot) = hand.iter().position(|&c| c == card) {
            hand[slot] = self.reserve;
        }
        next.reserve = card;
    }
}

impl GameState for AbductionState {
    fn current_team(&self) -> Team {
        self.team
    }

    fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        let steps = self.steps();
        if steps.is_empty() {
            return self.hands[self.team]
                .iter()
                .map(|&card| AbductionMove::Pass { card }.encode())
                .collect();
        }
        steps.into_iter().map(AbductionMove::encode).collect()
    }

    fn make_move(&self, mv: &Move) -> Result<Self, GameError> {
        ensure_legal(self, mv)?;
        let decoded = AbductionMove::decode(mv).ok_or_else(|| GameError::IllegalMove {
            token: mv.to_string(),
            label: self.label(),
        })?;

        let mut next = self.clone();
        if let AbductionMove::Step { from, to, .. } = decoded {
            next.board[to] = next.board[from].take();
        }
        self.rotate_cards(&mut next, decoded.card());
        next.team = self.team.other();
        next.plies = self.plies + 1;
        Ok(next)
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_capped()
    }

    fn reward(&self) -> Result<Reward, GameError> {
        match self.winner() {
            Some(team) => Ok(Reward::Winner(team)),
            None if self.is_capped() => Ok(Reward::Draw),
            None => Err(GameError::NotTerminal { label: self.label() }),
        }
    }

    fn label(&self) -> String {
        let mut out = String::with_capacity(48);
        out.push_str(self.team_label(self.team));
        out.push(':');
        for (i, cell) in self.board.iter().enumerate() {
            if i > 0 && i % SIZE == 0 {
                out.push('/');
            }
            out.push(cell.map_or('_', Piece::symbol));
        }
        for team in Team::ALL {
            let mut hand = self.hands[team];
            hand.sort_unstable();
            out.push_str(&format!("|{},{}", hand[0], hand[1]));
        }
        out.push_str(&format!("|{}|{}", self.reserve, self.plies));
        out
    }

    fn team_label(&self, team: Team) -> &'static str {
        match team {
            Team::A => "R",
            Team::B => "B",
        }
    }
}

impl TryFrom<crate::games::AnyState> for AbductionState {
    type Error = GameError;

    fn try_from(state: crate::games::AnyState) -> Result<Self, Self::Error> {
        match state {
            crate::games::AnyState::Abduction(abduction) => Ok(abduction),
            other => Err(GameError::VariantMismatch {
                expected: GameKind::Abduction,
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIGER: u8 = 4;
    const DOG: u8 = 26;

    fn hands(a: [u8; 2], b: [u8; 2]) -> TeamMap<[u8; 2]> {
        TeamMap::new(|t| if t == Team::A { a } else { b })
    }

    fn opening(team: Team) -> AbductionState {
        AbductionState::from_parts(
            AbductionState::starting_board(),
            team,
            hands([TIGER, 0], [TIGER + 1, 1]),
            2,
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_dealt_game() {
        let state = AbductionBuilder::new().build(&mut GameRng::new(7));
        let mut cards: Vec<u8> = state
            .hand(Team::A)
            .into_iter()
            .chain(state.hand(Team::B))
            .chain([state.reserve()])
            .collect();
        cards.sort_unstable();
        cards.dedup();
        assert_eq!(cards.len(), 5);
        assert_eq!(state.current_team(), card_at(state.reserve()).unwrap().first);
        assert!(!state.is_terminal());
        assert!(!state.legal_moves().is_empty());
    }

    #[test]
    fn test_base_set_deals_base_cards() {
        let state = AbductionBuilder::new()
            .card_set(CardSet::Base)
            .build(&mut GameRng::new(3));
        assert!(state
            .hand(Team::A)
            .iter()
            .chain(state.hand(Team::B).iter())
            .all(|&c| c < 16));
        assert!(state.reserve() < 16);
    }

    #[test]
    fn test_offsets_are_mirrored_for_team_b() {
        // Tiger (-2, 0): Team A moves up the board, Team B down.
        assert_eq!(AbductionState::destination(Team::A, 20, (-2, 0)), Some(10));
        assert_eq!(AbductionState::destination(Team::B, 0, (-2, 0)), Some(10));
        // Column offsets flip as well.
        assert_eq!(AbductionState::destination(Team::A, 12, (0, 1)), Some(13));
        assert_eq!(AbductionState::destination(Team::B, 12, (0, 1)), Some(11));
        // Off the board.
        assert_eq!(AbductionState::destination(Team::A, 0, (-1, 0)), None);
        assert_eq!(AbductionState::destination(Team::B, 4, (0, -1)), None);
    }

    #[test]
    fn test_opening_moves_use_held_cards() {
        let state = opening(Team::A);
        let moves: Vec<String> = state.legal_moves().iter().map(|m| m.to_string()).collect();
        // Tiger's backward step from the home row leaves the board.
        assert!(!moves.contains(&"4,20,25".to_string()));
        assert!(moves.contains(&"4,20,10".to_string()));
        assert!(moves.iter().all(|m| m.starts_with("4,") || m.starts_with("0,")));
        // Cards held by the opponent are never playable.
        assert!(state.make_move(&Move::from("5,0,6")).is_err());
    }

    #[test]
    fn test_step_rotates_cards() {
        let state = opening(Team::A);
        let next = state.make_move(&Move::from("4,20,10")).unwrap();

        assert_eq!(next.board()[10], Some(Piece::Student(Team::A)));
        assert_eq!(next.board()[20], None);
        assert_eq!(next.hand(Team::A), [2, 0]);
        assert_eq!(next.reserve(), TIGER);
        assert_eq!(next.current_team(), Team::B);
        assert_eq!(next.plies(), 1);
        // Source state untouched.
        assert_eq!(state.board()[20], Some(Piece::Student(Team::A)));
        assert_eq!(state.hand(Team::A), [TIGER, 0]);
    }

    #[test]
    fn test_capture_removes_opponent_piece() {
        let mut board = [None; CELLS];
        board[22] = Some(Piece::Master(Team::A));
        board[2] = Some(Piece::Master(Team::B));
        board[15] = Some(Piece::Student(Team::A));
        board[5] = Some(Piece::Student(Team::B));
        let state =
            AbductionState::from_parts(board, Team::A, hands([TIGER, 0], [5, 1]), 2, 0).unwrap();

        let next = state.make_move(&Move::from("4,15,5")).unwrap();
        assert_eq!(next.board()[5], Some(Piece::Student(Team::A)));
        assert_eq!(next.board().iter().flatten().count(), 3);
    }

    #[test]
    fn test_pass_when_no_step_is_possible() {
        // Team A fills column 0; Tiger and Dog cannot leave it.
        let mut board = [None; CELLS];
        for cell in [0, 5, 10, 15] {
            board[cell] = Some(Piece::Student(Team::A));
        }
        board[20] = Some(Piece::Master(Team::A));
        board[4] = Some(Piece::Master(Team::B));
        let state =
            AbductionState::from_parts(board, Team::A, hands([TIGER, DOG], [0, 1]), 2, 0).unwrap();

        let moves = state.legal_moves();
        assert_eq!(moves, vec![Move::from("pass 4"), Move::from("pass 26")]);

        let next = state.make_move(&Move::from("pass 4")).unwrap();
        assert_eq!(next.board(), state.board());
        assert_eq!(next.hand(Team::A), [2, DOG]);
        assert_eq!(next.reserve(), TIGER);
        assert_eq!(next.current_team(), Team::B);
        assert_eq!(next.plies(), 1);
    }

    #[test]
    fn test_pass_is_illegal_when_steps_exist() {
        let state = opening(Team::A);
        assert!(state.make_move(&Move::from("pass 4")).is_err());
    }

    #[test]
    fn test_master_capture_wins() {
        let mut board = [None; CELLS];
        board[12] = Some(Piece::Master(Team::A));
        board[7] = Some(Piece::Master(Team::B));
        // Boar (-1, 0) takes the master.
        let state =
            AbductionState::from_parts(board, Team::A, hands([2, 0], [5, 1]), 3, 0).unwrap();

        let next = state.make_move(&Move::from("2,12,7")).unwrap();
        assert!(next.is_terminal());
        assert_eq!(next.winner(), Some(Team::A));
        assert_eq!(next.reward().unwrap(), Reward::Winner(Team::A));
        assert!(next.legal_moves().is_empty());
    }

    #[test]
    fn test_temple_arrival_wins() {
        let mut board = [None; CELLS];
        board[7] = Some(Piece::Master(Team::A));
        board[0] = Some(Piece::Master(Team::B));
        let state =
            AbductionState::from_parts(board, Team::A, hands([2, 0], [5, 1]), 3, 0).unwrap();

        let next = state.make_move(&Move::from("2,7,2")).unwrap();
        assert_eq!(next.winner(), Some(Team::A));

        // Team B reaching cell 22 wins for B.
        let mut board = [None; CELLS];
        board[24] = Some(Piece::Master(Team::A));
        board[22] = Some(Piece::Master(Team::B));
        let state =
            AbductionState::from_parts(board, Team::A, hands([2, 0], [5, 1]), 3, 0).unwrap();
        assert_eq!(state.winner(), Some(Team::B));
    }

    #[test]
    fn test_move_cap_draws() {
        let state = opening(Team::A).with_move_cap(1);
        assert!(!state.is_terminal());
        assert!(state.reward().is_err());

        let next = state.make_move(&Move::from("4,20,10")).unwrap();
        assert!(next.is_terminal());
        assert_eq!(next.reward().unwrap(), Reward::Draw);
        assert!(next.legal_moves().is_empty());
    }

    #[test]
    fn test_from_parts_rejects_duplicate_cards() {
        let err = AbductionState::from_parts(
            AbductionState::starting_board(),
            Team::A,
            hands([1, 1], [2, 3]),
            4,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidSetup { .. }));
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            AbductionMove::decode(&Move::from("3,21,16")),
            Some(AbductionMove::Step { card: 3, from: 21, to: 16 })
        );
        assert_eq!(
            AbductionMove::decode(&Move::from("pass 7")),
            Some(AbductionMove::Pass { card: 7 })
        );
        assert_eq!(AbductionMove::decode(&Move::from("pass7")), None);
        assert_eq!(AbductionMove::decode(&Move::from("3,21,25")), None);
        assert_eq!(AbductionMove::decode(&Move::from("3,21")), None);
    }

    #[test]
    fn test_label() {
        let label = opening(Team::A).label();
        assert_eq!(label, "R:bbBbb/_____/_____/_____/rrRrr|0,4|1,5|2|0");
    }

    #[test]
    fn test_label_tracks_plies() {
        let near_cap = AbductionState::from_parts(
            AbductionState::starting_board(),
            Team::A,
            hands([TIGER, 0], [TIGER + 1, 1]),
            2,
            9,
        )
        .unwrap()
        .with_move_cap(10);
        let fresh = opening(Team::A).with_move_cap(10);

        assert_eq!(near_cap.board(), fresh.board());
        assert_ne!(near_cap.label(), fresh.label());
        assert!(near_cap.label().ends_with("|2|9"));
    }

    #[test]
    fn test_deserialize_validates_parts() {
        let state = opening(Team::B).with_move_cap(50);
        let json = serde_json::to_string(&state).unwrap();
        let back: AbductionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.legal_moves(), state.legal_moves());

        let mut value = serde_json::to_value(&state).unwrap();
        value["reserve"] = serde_json::json!(200);
        assert!(serde_json::from_value::<AbductionState>(value).is_err());

        let mut value = serde_json::to_value(&state).unwrap();
        value["reserve"] = serde_json::json!(TIGER);
        assert!(serde_json::from_value::<AbductionState>(value).is_err());

        let mut value = serde_json::to_value(&state).unwrap();
        value["move_cap"] = serde_json::json!(0);
        assert!(serde_json::from_value::<AbductionState>(value).is_err());
    }
}
