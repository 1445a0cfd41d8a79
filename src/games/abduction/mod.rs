//! Card-driven abduction game on a 5×5 board.
//!
//! Each team has four students and a master. Five movement cards are dealt:
//! two per team and one in reserve. Playing a card moves one of your pieces
//! by one of its offsets, then the card goes to the reserve and you take the
//! old reserve card. A team with no ordinary move must pass with one of its
//! cards, which still rotates it.
//!
//! A team wins by capturing the opposing master or by walking its own master
//! onto the opponent's starting cell. A configurable ply cap ends the game in
//! a draw.

mod cards;
mod game;

pub use cards::{card_at, Card, CardSet, DECK};
pub use game::{AbductionBuilder, AbductionMove, AbductionState, Piece, DEFAULT_MOVE_CAP, SIZE};
