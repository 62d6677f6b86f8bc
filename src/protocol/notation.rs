//! Compact layout notation.
//!
//! A layout is written as one character per row, `L` or `R`, naming the
//! safe tile of that row, e.g. `LRRL` for a four-row bridge. Side tokens in
//! commands use the looser forms accepted by [`Side::from_token`].

use crate::board::{BridgeLayout, Side};

/// Errors that can occur while parsing notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty layout")]
    EmptyLayout,

    #[error("invalid layout character '{ch}' at row {row}")]
    InvalidLayoutChar { ch: char, row: usize },

    #[error("invalid side '{0}', expected l/r, left/right or 1/2")]
    InvalidSide(String),
}

/// Parses layout notation such as `LRL`.
pub fn parse_layout(s: &str) -> Result<BridgeLayout, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::EmptyLayout);
    }
    let sides = s
        .chars()
        .enumerate()
        .map(|(row, ch)| {
            Side::from_notation_char(ch.to_ascii_uppercase())
                .ok_or(NotationError::InvalidLayoutChar { ch, row })
        })
        .collect::<Result<Vec<_>, _>>()?;
    BridgeLayout::from_safe_sides(sides).map_err(|_| NotationError::EmptyLayout)
}

/// Encodes a layout as notation.
pub fn encode_layout(layout: &BridgeLayout) -> String {
    layout.safe_sides().iter().map(|s| s.notation_char()).collect()
}

/// Parses a side token from a `move` command.
pub fn parse_side(token: &str) -> Result<Side, NotationError> {
    Side::from_token(token).ok_or_else(|| NotationError::InvalidSide(token.to_string()))
}
