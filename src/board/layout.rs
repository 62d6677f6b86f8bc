//! Bridge layout generation and move evaluation.
//!
//! A layout fixes, for every row, which of the two tiles holds. It is drawn
//! once per session and never changes afterwards; the only way to observe it
//! during play is [`BridgeLayout::evaluate`].
//!
//! Layouts serialize as a list of `[left_is_safe, right_is_safe]` pairs, the
//! shape session logs store them in.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::side::Side;
use crate::config::ConfigError;

/// Result of stepping onto a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Safe,
    Broken,
}

/// Errors raised when rebuilding a layout from its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has {safe} safe tiles, expected exactly one")]
    SafeCount { row: usize, safe: usize },
}

/// The safe/broken configuration of every row of the bridge.
///
/// Each row stores only its safe side, so "exactly one safe tile per row"
/// holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<[bool; 2]>", try_from = "Vec<[bool; 2]>")]
pub struct BridgeLayout {
    safe: Vec<Side>,
}

impl BridgeLayout {
    /// Draws a layout of `row_count` rows, picking each row's safe side
    /// uniformly and independently.
    pub fn generate<R: Rng + ?Sized>(row_count: usize, rng: &mut R) -> Result<Self, ConfigError> {
        if row_count == 0 {
            return Err(ConfigError::EmptyBridge);
        }
        let safe = (0..row_count)
            .map(|_| if rng.gen_bool(0.5) { Side::Left } else { Side::Right })
            .collect();
        Ok(BridgeLayout { safe })
    }

    /// Builds a layout with the given safe side per row.
    pub fn from_safe_sides(safe: Vec<Side>) -> Result<Self, ConfigError> {
        if safe.is_empty() {
            return Err(ConfigError::EmptyBridge);
        }
        Ok(BridgeLayout { safe })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.safe.len()
    }

    /// Always false; a layout has at least one row.
    pub fn is_empty(&self) -> bool {
        self.safe.is_empty()
    }

    /// Index of the row whose safe tile ends the crossing.
    pub fn last_row(&self) -> usize {
        self.safe.len() - 1
    }

    /// Safe side of `row`, or `None` past the end of the bridge.
    pub fn safe_side(&self, row: usize) -> Option<Side> {
        self.safe.get(row).copied()
    }

    /// Safe sides of all rows in order.
    pub fn safe_sides(&self) -> &[Side] {
        &self.safe
    }

    /// Looks up what happens when a player steps on `side` of `row`.
    ///
    /// Pure lookup. Panics if `row` is past the end of the bridge; callers
    /// validate the row first.
    pub fn evaluate(&self, row: usize, side: Side) -> Outcome {
        if self.safe[row] == side {
            Outcome::Safe
        } else {
            Outcome::Broken
        }
    }
}

impl From<BridgeLayout> for Vec<[bool; 2]> {
    fn from(layout: BridgeLayout) -> Self {
        layout
            .safe
            .iter()
            .map(|&side| [side == Side::Left, side == Side::Right])
            .collect()
    }
}

impl TryFrom<Vec<[bool; 2]>> for BridgeLayout {
    type Error = LayoutError;

    fn try_from(rows: Vec<[bool; 2]>) -> Result<Self, Self::Error> {
        if rows.is_empty() {
            return Err(LayoutError::Empty);
        }
        let safe = rows
            .iter()
            .enumerate()
            .map(|(row, tiles)| match tiles {
                [true, false] => Ok(Side::Left),
                [false, true] => Ok(Side::Right),
                _ => Err(LayoutError::SafeCount {
                    row,
                    safe: tiles.iter().filter(|&&t| t).count(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BridgeLayout { safe })
    }
}
