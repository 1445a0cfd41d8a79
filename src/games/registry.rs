//! Game registry for variant lookup.
//!
//! Maps a [`GameKind`] to its display name and a constructor for a fresh
//! initial state. Rendering is left to whatever front end consumes the
//! registry; the core only promises a `label()` for every state.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::abduction::{AbductionBuilder, CardSet, DEFAULT_MOVE_CAP};
use super::grid::GridState;
use super::territory::TerritoryBuilder;
use super::{AnyState, GameKind};
use crate::core::GameRng;
use crate::error::GameError;

/// Territory board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritorySetup {
    pub rows: usize,
    pub cols: usize,
    /// Palette size, between 2 and 36.
    pub colors: u8,
}

impl Default for TerritorySetup {
    fn default() -> Self {
        Self {
            rows: 7,
            cols: 7,
            colors: 6,
        }
    }
}

/// Abduction deal options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbductionSetup {
    pub card_set: CardSet,
    pub move_cap: u32,
}

impl Default for AbductionSetup {
    fn default() -> Self {
        Self {
            card_set: CardSet::All,
            move_cap: DEFAULT_MOVE_CAP,
        }
    }
}

/// Per-variant options used when creating initial states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSetup {
    pub territory: TerritorySetup,
    pub abduction: AbductionSetup,
}

type Constructor = fn(&GameSetup, &mut GameRng) -> Result<AnyState, GameError>;

/// Registry entry for one variant.
#[derive(Clone, Copy)]
pub struct GameEntry {
    pub kind: GameKind,
    pub display_name: &'static str,
    create: Constructor,
}

impl std::fmt::Debug for GameEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEntry")
            .field("kind", &self.kind)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl GameEntry {
    /// Create a fresh initial state.
    pub fn create_initial_state(
        &self,
        setup: &GameSetup,
        rng: &mut GameRng,
    ) -> Result<AnyState, GameError> {
        (self.create)(setup, rng)
    }
}

fn create_grid(_: &GameSetup, _: &mut GameRng) -> Result<AnyState, GameError> {
    Ok(GridState::new().into())
}

fn create_territory(setup: &GameSetup, rng: &mut GameRng) -> Result<AnyState, GameError> {
    let TerritorySetup { rows, cols, colors } = setup.territory;
    TerritoryBuilder::new()
        .rows(rows)
        .cols(cols)
        .colors(colors)
        .build(rng)
        .map(AnyState::from)
}

fn create_abduction(setup: &GameSetup, rng: &mut GameRng) -> Result<AnyState, GameError> {
    let AbductionSetup { card_set, move_cap } = setup.abduction;
    if move_cap == 0 {
        return Err(GameError::InvalidSetup {
            game: GameKind::Abduction,
            reason: "move cap must be positive".to_string(),
        });
    }
    Ok(AbductionBuilder::new()
        .card_set(card_set)
        .move_cap(move_cap)
        .build(rng)
        .into())
}

/// Registry of playable variants.
///
/// ## Example
///
/// ```
/// use mcts_arena::core::{GameRng, GameState};
/// use mcts_arena::games::{GameKind, GameRegistry, GameSetup};
///
/// let registry = GameRegistry::new();
/// let entry = registry.get(GameKind::Grid).unwrap();
/// assert_eq!(entry.display_name, "Tic-Tac-Toe");
///
/// let state = entry
///     .create_initial_state(&GameSetup::default(), &mut GameRng::new(0))
///     .unwrap();
/// assert_eq!(state.legal_moves().len(), 9);
/// ```
#[derive(Clone, Debug)]
pub struct GameRegistry {
    entries: FxHashMap<GameKind, GameEntry>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    /// Registry holding every built-in variant.
    #[must_use]
    pub fn new() -> Self {
        let builtin: [(GameKind, &'static str, Constructor); 3] = [
            (GameKind::Grid, "Tic-Tac-Toe", create_grid),
            (GameKind::Territory, "Filler", create_territory),
            (GameKind::Abduction, "Onitama", create_abduction),
        ];
        let entries = builtin
            .into_iter()
            .map(|(kind, display_name, create)| {
                (
                    kind,
                    GameEntry {
                        kind,
                        display_name,
                        create,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Look up a variant.
    #[must_use]
    pub fn get(&self, kind: GameKind) -> Option<&GameEntry> {
        self.entries.get(&kind)
    }

    /// Create a fresh initial state for `kind`.
    pub fn create(
        &self,
        kind: GameKind,
        setup: &GameSetup,
        rng: &mut GameRng,
    ) -> Result<AnyState, GameError> {
        let entry = self.get(kind).ok_or_else(|| GameError::InvalidSetup {
            game: kind,
            reason: "variant is not registered".to_string(),
        })?;
        entry.create_initial_state(setup, rng)
    }

    /// Entries in `GameKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &GameEntry> {
        GameKind::ALL.iter().filter_map(|kind| self.entries.get(kind))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
