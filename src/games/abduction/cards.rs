//! The movement card deck.
//!
//! Offsets are written from Team A's side of the board, `(row, col)` with
//! row 0 at Team B's home row. Team B plays every card mirrored.

use serde::{Deserialize, Serialize};

use crate::core::Team;

/// A movement card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card {
    pub name: &'static str,
    /// Team that opens the game when this card starts in reserve.
    pub first: Team,
    /// Relative `(row, col)` offsets for Team A.
    pub offsets: &'static [(i8, i8)],
}

const R: Team = Team::A;
const B: Team = Team::B;

const fn card(name: &'static str, first: Team, offsets: &'static [(i8, i8)]) -> Card {
    Card { name, first, offsets }
}

/// Full deck: 16 base cards followed by 16 "Sensei's Path" cards.
pub const DECK: [Card; 32] = [
    // Base
    card("Dragon", R, &[(-1, -2), (-1, 2), (1, -1), (1, 1)]),
    card("Elephant", R, &[(-1, -1), (-1, 1), (0, -1), (0, 1)]),
    card("Boar", R, &[(-1, 0), (0, -1), (0, 1)]),
    card("Mantis", R, &[(-1, -1), (-1, 1), (1, 0)]),
    card("Tiger", B, &[(-2, 0), (1, 0)]),
    card("Monkey", B, &[(-1, -1), (-1, 1), (1, -1), (1, 1)]),
    card("Crab", B, &[(-1, 0), (0, -2), (0, 2)]),
    card("Crane", B, &[(-1, 0), (1, -1), (1, 1)]),
    card("Rabbit", B, &[(-1, 1), (0, 2), (1, -1)]),
    card("Rooster", R, &[(-1, 1), (0, -1), (0, 1), (1, -1)]),
    card("Ox", B, &[(-1, 0), (0, 1), (1, 0)]),
    card("Cobra", R, &[(-1, 1), (0, -1), (1, 1)]),
    card("Frog", R, &[(-1, -1), (0, -2), (1, 1)]),
    card("Goose", B, &[(-1, -1), (0, -1), (0, 1), (1, 1)]),
    card("Horse", R, &[(-1, 0), (0, -1), (1, 0)]),
    card("Eel", B, &[(-1, -1), (0, 1), (1, -1)]),
    // Sensei's Path
    card("Giraffe", B, &[(-1, -2), (-1, 2), (1, 0)]),
    card("Kirin", R, &[(-2, -1), (-2, 1), (2, 0)]),
    card("Phoenix", B, &[(-1, -1), (-1, 1), (0, -2), (0, 2)]),
    card("Turtle", R, &[(0, -2), (0, 2), (1, -1), (1, 1)]),
    card("Fox", R, &[(-1, 1), (0, 1), (1, 1)]),
    card("Panda", R, &[(-1, 0), (-1, 1), (1, -1)]),
    card("Sea Snake", B, &[(-1, 0), (0, 2), (1, -1)]),
    card("Mouse", B, &[(-1, 0), (0, 1), (1, -1)]),
    card("Tanuki", B, &[(-1, 0), (-1, 2), (1, -1)]),
    card("Sable", B, &[(-1, 1), (0, -2), (1, -1)]),
    card("Dog", B, &[(-1, -1), (0, -1), (1, -1)]),
    card("Bear", B, &[(-1, -1), (-1, 0), (1, 1)]),
    card("Viper", R, &[(-1, 0), (0, -2), (1, 1)]),
    card("Rat", R, &[(-1, 0), (0, -1), (1, 1)]),
    card("Iguana", R, &[(-1, -2), (-1, 0), (1, 1)]),
    card("Otter", R, &[(-1, -1), (0, 2), (1, 1)]),
];

/// Which part of the deck a game is dealt from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSet {
    Base,
    Sensei,
    #[default]
    All,
}

impl CardSet {
    /// Deck indices belonging to this set.
    #[must_use]
    pub fn indices(self) -> Vec<u8> {
        match self {
            CardSet::Base => (0..16).collect(),
            CardSet::Sensei => (16..32).collect(),
            CardSet::All => (0..32).collect(),
        }
    }
}

/// Look up a card by deck index.
#[must_use]
pub fn card_at(index: u8) -> Option<&'static Card> {
    DECK.get(index as usize)
}
