//! Line protocol handling.
//!
//! Parsing for the engine's text protocol (GBI, Glass Bridge Interface) and
//! the compact notation it uses for layouts and sides.

pub mod notation;
pub mod parser;

pub use notation::{encode_layout, parse_layout, parse_side, NotationError};
pub use parser::{parse_command, Command, ParseError};
