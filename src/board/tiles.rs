//! What play has revealed about the bridge so far.

use serde::{Deserialize, Serialize};

use super::layout::Outcome;
use super::side::{Side, ALL_SIDES};

/// Reveal state of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileState {
    #[default]
    Hidden,
    /// Someone stood on it and it held.
    Proven,
    /// It broke under a player, or fell when the bridge collapsed.
    Shattered,
}

/// Reveal state of every tile, indexed by row then `Side::index()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileGrid {
    rows: Vec<[TileState; 2]>,
}

impl TileGrid {
    /// A grid of `rows` rows with every tile hidden.
    pub fn new(rows: usize) -> Self {
        TileGrid {
            rows: vec![[TileState::Hidden; 2]; rows],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, side: Side) -> TileState {
        self.rows[row][side.index()]
    }

    /// Records the outcome of a step.
    pub fn reveal(&mut self, row: usize, side: Side, outcome: Outcome) {
        self.rows[row][side.index()] = match outcome {
            Outcome::Safe => TileState::Proven,
            Outcome::Broken => TileState::Shattered,
        };
    }

    /// True if either tile of `row` has been revealed.
    pub fn row_revealed(&self, row: usize) -> bool {
        self.rows[row].iter().any(|&t| t != TileState::Hidden)
    }

    /// Drops every tile that can no longer hold anyone: both tiles of rows
    /// nobody stepped on, and the hidden tile of rows whose safe tile was
    /// proven. A row where only the broken tile was revealed keeps its safe
    /// tile. Returns the rows where at least one tile fell.
    pub fn collapse(&mut self) -> Vec<usize> {
        let mut collapsed = Vec::new();
        for row in 0..self.rows.len() {
            let untouched = !self.row_revealed(row);
            let proven = self.rows[row].contains(&TileState::Proven);
            if !untouched && !proven {
                continue;
            }
            let mut fell = false;
            for side in ALL_SIDES {
                let tile = &mut self.rows[row][side.index()];
                if *tile == TileState::Hidden {
                    *tile = TileState::Shattered;
                    fell = true;
                }
            }
            if fell {
                collapsed.push(row);
            }
        }
        collapsed
    }
}
