//! Tile sides.
//!
//! Every bridge row offers the same two choices, a left tile and a right
//! tile. Exactly one of them holds.

use serde::{Deserialize, Serialize};

/// One of the two tiles in a bridge row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Both sides in column order.
pub const ALL_SIDES: [Side; 2] = [Side::Left, Side::Right];

impl Side {
    /// Returns the lowercase protocol character.
    pub const fn protocol_char(self) -> char {
        match self {
            Side::Left => 'l',
            Side::Right => 'r',
        }
    }

    /// Returns the uppercase character used in layout notation.
    pub const fn notation_char(self) -> char {
        match self {
            Side::Left => 'L',
            Side::Right => 'R',
        }
    }

    /// Column index of this side within a row.
    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Parses a side from a protocol token.
    ///
    /// Accepts `l`/`r`, the full words, and the `1`/`2` key bindings, in any
    /// letter case.
    pub fn from_token(token: &str) -> Option<Side> {
        match token.to_ascii_lowercase().as_str() {
            "l" | "left" | "1" => Some(Side::Left),
            "r" | "right" | "2" => Some(Side::Right),
            _ => None,
        }
    }

    /// Parses a side from its layout notation character.
    pub fn from_notation_char(c: char) -> Option<Side> {
        match c {
            'L' => Some(Side::Left),
            'R' => Some(Side::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_token_accepts_all_spellings() {
        for token in ["l", "L", "left", "LEFT", "1"] {
            assert_eq!(Side::from_token(token), Some(Side::Left), "{}", token);
        }
        for token in ["r", "R", "right", "Right", "2"] {
            assert_eq!(Side::from_token(token), Some(Side::Right), "{}", token);
        }
        assert_eq!(Side::from_token("3"), None);
        assert_eq!(Side::from_token(""), None);
        assert_eq!(Side::from_token("middle"), None);
    }

    #[test]
    fn notation_char_roundtrip() {
        for side in ALL_SIDES {
            assert_eq!(Side::from_notation_char(side.notation_char()), Some(side));
        }
        assert_eq!(Side::from_notation_char('l'), None);
    }

    #[test]
    fn index_matches_column() {
        assert_eq!(Side::Left.index(), 0);
        assert_eq!(Side::Right.index(), 1);
    }
}
