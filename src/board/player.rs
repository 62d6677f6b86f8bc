//! Players and the session roster.
//!
//! A player starts on the platform before row 0, walks onto the bridge one
//! row at a time, and ends either fallen or across. Both endings are final.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::side::Side;
use crate::config::ConfigError;

/// Index of a player in the roster, stable for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

/// Why a player fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallCause {
    /// Stepped on the broken tile of a row.
    BrokenTile,
    /// Still on the bridge or platform when the countdown ran out.
    TimeOut,
}

/// Where a player is in their attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Waiting,
    OnBridge,
    Fallen(FallCause),
    Crossed,
}

impl PlayerState {
    /// True for `Fallen` and `Crossed`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, PlayerState::Fallen(_) | PlayerState::Crossed)
    }
}

/// A participant in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub name: String,
    pub state: PlayerState,
    /// Last row stood on; `None` while still on the starting platform.
    pub row: Option<usize>,
    /// Tile of `row`; `None` until the first safe step.
    pub side: Option<Side>,
}

impl Player {
    /// Creates a player waiting on the starting platform.
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            state: PlayerState::Waiting,
            row: None,
            side: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The only row this player may step onto next.
    pub fn next_row(&self) -> usize {
        self.row.map_or(0, |r| r + 1)
    }

    /// Short status text for a player list, e.g. `On tile 3/10`.
    pub fn status_line(&self, bridge_length: usize) -> String {
        match self.state {
            PlayerState::Waiting => "Waiting".to_string(),
            PlayerState::OnBridge => {
                format!("On tile {}/{}", self.row.map_or(0, |r| r + 1), bridge_length)
            }
            PlayerState::Fallen(FallCause::BrokenTile) => "Fallen!".to_string(),
            PlayerState::Fallen(FallCause::TimeOut) => "Timed Out!".to_string(),
            PlayerState::Crossed => "Crossed!".to_string(),
        }
    }
}

/// All players of a session in selection order, indexed by [`PlayerId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Builds a roster from player names in selection order.
    ///
    /// Rejects an empty list and duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut players = Vec::new();
        for name in names {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicatePlayer(name));
            }
            players.push(Player::new(name));
        }
        if players.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        Ok(Roster { players })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> &Player {
        &self.players[id.0]
    }

    pub fn get_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.0]
    }

    /// Looks a player up by name.
    pub fn find(&self, name: &str) -> Option<PlayerId> {
        self.players.iter().position(|p| p.name == name).map(PlayerId)
    }

    /// All ids in selection order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.players.len()).map(PlayerId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Names of every player, in selection order.
    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Names of players who crossed, in selection order.
    pub fn crossed_names(&self) -> Vec<String> {
        self.names_where(|s| s == PlayerState::Crossed)
    }

    /// Names of players who fell for any reason, in selection order.
    pub fn fallen_names(&self) -> Vec<String> {
        self.names_where(|s| matches!(s, PlayerState::Fallen(_)))
    }

    fn names_where(&self, pred: impl Fn(PlayerState) -> bool) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| pred(p.state))
            .map(|p| p.name.clone())
            .collect()
    }
}
