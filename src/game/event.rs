//! State changes reported to the presentation layer.
//!
//! Every mutating controller call returns the events it caused, in order.
//! A renderer replays them; it never drives the state itself.

use std::time::Duration;

use serde::Serialize;

use crate::board::{FallCause, Outcome, Side};
use crate::session::record::serialize_secs;
use crate::session::SessionSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The first step of the session started the countdown.
    TimerStarted {
        #[serde(serialize_with = "serialize_secs")]
        limit: Duration,
    },
    /// A tile was stepped on.
    TileRevealed { row: usize, side: Side, outcome: Outcome },
    /// A player now stands on a safe tile.
    PlayerMoved { player: String, row: usize, side: Side },
    /// A player is out. `row` is the last safe row they stood on.
    PlayerFell {
        player: String,
        row: Option<usize>,
        cause: FallCause,
    },
    PlayerCrossed { player: String },
    /// The turn passed to another player.
    TurnChanged { player: String },
    TimeRemaining {
        #[serde(serialize_with = "serialize_secs")]
        remaining: Duration,
    },
    /// Tiles fell when time ran out.
    BridgeCollapsed { rows: Vec<usize> },
    GameOver { summary: SessionSummary },
}
