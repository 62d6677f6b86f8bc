//! Bridge and player representation.
//!
//! Contains the bridge layout with its move evaluation, the per-tile reveal
//! grid, and the player roster.

pub mod layout;
pub mod player;
pub mod side;
pub mod tiles;

pub use layout::{BridgeLayout, LayoutError, Outcome};
pub use player::{FallCause, Player, PlayerId, PlayerState, Roster};
pub use side::{Side, ALL_SIDES};
pub use tiles::{TileGrid, TileState};
