//! Move tokens.
//!
//! A move is an opaque string whose grammar belongs to the game that
//! produced it (see each game's `*Move` type for the typed view):
//! - Grid: `"4"` (cell index)
//! - Territory: `"2"` (colour index)
//! - Abduction: `"7,21,16"` (card, source, destination) or `"pass 7"`
//!
//! A token is only meaningful against the state it was generated from.
//! Games never trust a token: `make_move` re-checks membership in
//! `legal_moves()` before decoding it.

use serde::{Deserialize, Serialize};

/// An opaque, game-specific move token.
///
/// ```
/// use mcts_arena::core::Move;
///
/// let mv = Move::from("4");
/// assert_eq!(mv.as_str(), "4");
/// assert_eq!(mv.to_string(), "4");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(String);

impl Move {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Move {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for Move {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma-separated list of decimal fields.
///
/// Returns `None` on any empty, non-decimal, or whitespace-padded field.
pub(crate) fn parse_fields(token: &str) -> Option<Vec<usize>> {
    token
        .split(',')
        .map(|field| {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                field.parse().ok()
            }
        })
        .collect()
}
