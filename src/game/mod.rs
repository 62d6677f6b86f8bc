//! Game control.
//!
//! Ties layout, roster, scheduler and countdown together into one session
//! and reports what changed as [`GameEvent`]s.

pub mod controller;
pub mod event;

pub use controller::{GameController, Move, MoveError};
pub use event::GameEvent;
