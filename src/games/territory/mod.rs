//! Flood-fill territory game.
//!
//! Every cell of an R×C board holds one of K colours. Team A owns the
//! connected region around the top-left cell, Team B the region around the
//! bottom-right cell. A move picks a colour: the mover's whole region is
//! recoloured, swallowing every neighbouring cell of that colour.
//!
//! - Legal colours are present on the board and held by neither anchor
//! - The game ends when no such colour is left
//! - Each team scores its region size over the board size

mod game;

pub use game::{TerritoryBuilder, TerritoryMove, TerritoryState, MAX_COLORS};
