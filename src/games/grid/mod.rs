//! Three-in-a-row on a 3×3 grid.
//!
//! The baseline game for contract conformance:
//! - X (Team A) moves first, players alternate placing marks
//! - A move is the index of an empty cell, `"0"`..`"8"`
//! - Three in a row wins; a full board without a line is a draw

mod game;

pub use game::{GridMove, GridState, LINES};
