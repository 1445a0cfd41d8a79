//! Session controller: timeline, busy guard, autoplay.
//!
//! ## Overview
//!
//! A [`Session`] turns discrete, possibly asynchronous requests into one
//! consistent timeline:
//!
//! - **One transition at a time**: a scoped busy guard spans the whole
//!   request, oracle call included, and is released on every exit path
//! - **Branching history**: undo/redo move a cursor; a new move after an
//!   undo discards the old future
//! - **Cooperative autoplay**: a spawned loop checks the live flag before
//!   every step, so a stop takes effect before the next search starts
//! - **Non-exceptional refusals**: busy, autoplaying, terminal, and
//!   out-of-range requests come back as [`Transition::Rejected`]

pub mod config;
pub mod control;
pub mod controller;
pub mod timeline;

pub use config::SessionConfig;
pub use control::{MoveGuard, SessionControl};
pub use controller::{AutoplayToggle, Rejection, Session, SessionSnapshot, Transition};
pub use timeline::Timeline;
