//! Glassbridge engine library.
//!
//! Exposes the bridge and roster representation, turn scheduling, the
//! countdown, the game controller, session logging and the line protocol
//! for use by integration tests and the binary entry point.

pub mod board;
pub mod config;
pub mod engine;
pub mod game;
pub mod protocol;
pub mod session;
pub mod timer;
pub mod turn;
