//! Core building blocks shared by every game: teams, move tokens, rewards,
//! the `GameState` contract, and deterministic RNG.

pub mod action;
pub mod rng;
pub mod state;
pub mod team;

pub use action::Move;
pub use rng::GameRng;
pub use state::{GameState, Reward};
pub use team::{Team, TeamMap};
