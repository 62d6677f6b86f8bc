//! Engine state management.
//!
//! Holds the options, the shared session logger and the running session
//! between commands, and writes protocol responses for each command.

use std::io::{self, Write};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::board::BridgeLayout;
use crate::config::{
    ConfigError, GameConfig, DEFAULT_BRIDGE_LENGTH, DEFAULT_TIME_LIMIT, MAX_BRIDGE_LENGTH,
    MAX_TIME_LIMIT,
};
use crate::game::{GameController, GameEvent};
use crate::protocol::encode_layout;
use crate::protocol::parser::Command;
use crate::session::{NullLogger, SessionContext, SessionLogger, SharedLogger};

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub config: GameConfig,
    /// Layout for the next `newgame`, consumed by it.
    pub pending_layout: Option<BridgeLayout>,
    pub game: Option<GameController>,
    logger: SharedLogger,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine that discards session records.
    pub fn new() -> Self {
        Self::with_logger(NullLogger)
    }

    /// Creates an engine reporting sessions to `logger`.
    pub fn with_logger(logger: impl SessionLogger + Send + 'static) -> Self {
        Engine {
            config: GameConfig::default(),
            pending_layout: None,
            game: None,
            logger: SharedLogger::new(logger),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Dispatches a parsed command. `Quit` is left to the caller.
    pub fn handle_command<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Gbi => self.handle_gbi(out),
            Command::IsReady => self.handle_isready(out),
            Command::SetOption { name, value } => {
                let value = value.unwrap_or_default();
                match self.set_option(&name, &value) {
                    Ok(()) => Ok(()),
                    Err(e) => reject(out, &e),
                }
            }
            Command::SetLayout { layout } => {
                self.pending_layout = Some(layout);
                Ok(())
            }
            Command::NewGame { players } => self.handle_newgame(players, out),
            Command::Move { side } => match self.game.as_mut() {
                Some(game) => match game.submit_move(side) {
                    Ok(events) => write_events(out, &events),
                    Err(e) => reject(out, &e),
                },
                None => reject(out, &"no game in progress"),
            },
            Command::EndTurn => match self.game.as_mut() {
                Some(game) => match game.end_turn() {
                    Ok(events) => write_events(out, &events),
                    Err(e) => reject(out, &e),
                },
                None => reject(out, &"no game in progress"),
            },
            Command::Tick { millis } => match self.game.as_mut() {
                Some(game) => write_events(out, &game.tick(Duration::from_millis(millis))),
                None => Ok(()),
            },
            Command::Status => self.handle_status(out),
            Command::Quit => Ok(()),
        }
    }

    /// Applies an engine option. `Seed` also reseeds the layout generator.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.config.set_option(name, value)?;
        if name.eq_ignore_ascii_case("seed") {
            self.rng = match self.config.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
        }
        debug!(name, value, "option set");
        Ok(())
    }

    /// Handles the handshake: writes id, options, protocol_version, and gbiok.
    pub fn handle_gbi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name glassbridge")?;
        writeln!(out, "id author glassbridge")?;
        writeln!(
            out,
            "option name BridgeLength type spin default {} min 1 max {}",
            DEFAULT_BRIDGE_LENGTH, MAX_BRIDGE_LENGTH
        )?;
        writeln!(
            out,
            "option name TimeLimit type spin default {} min 1 max {}",
            DEFAULT_TIME_LIMIT.as_secs(),
            MAX_TIME_LIMIT.as_secs()
        )?;
        writeln!(
            out,
            "option name TurnPolicy type combo default continue var continue var rotate"
        )?;
        writeln!(out, "option name Seed type spin default 0 min 0")?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "gbiok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Starts a new session, ending any unfinished one first.
    pub fn handle_newgame<W: Write>(&mut self, players: Vec<String>, out: &mut W) -> io::Result<()> {
        if let Some(game) = self.game.as_mut() {
            if !game.is_over() {
                warn!("abandoning unfinished session");
                game.finalize(false);
            }
        }

        let ctx = SessionContext::with_logger(self.logger.clone());
        let started = match self.pending_layout.take() {
            Some(layout) => GameController::new(self.config.clone(), players, layout, ctx),
            None => GameController::start(self.config.clone(), players, &mut self.rng, ctx),
        };
        match started {
            Ok(game) => {
                let session = game
                    .session_id()
                    .map_or_else(|| "none".to_string(), |id| id.to_string());
                writeln!(out, "session {} rows {}", session, game.layout().len())?;
                if let Some(current) = game.current_player() {
                    writeln!(out, "turn {}", current.name)?;
                }
                self.game = Some(game);
                out.flush()
            }
            Err(e) => {
                self.game = None;
                reject(out, &e)
            }
        }
    }

    /// Handles the `status` command.
    pub fn handle_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(game) = self.game.as_ref() else {
            writeln!(out, "status idle")?;
            return out.flush();
        };

        let rows = game.layout().len();
        writeln!(out, "status {}", if game.is_over() { "over" } else { "running" })?;
        if let Some(current) = game.current_player() {
            writeln!(out, "current {}", current.name)?;
        }
        writeln!(out, "time {:.1}", game.remaining_time().as_secs_f64())?;
        for player in game.roster().iter() {
            writeln!(out, "player {} {}", player.name, player.status_line(rows))?;
        }
        if let Some(summary) = game.summary() {
            writeln!(out, "layout {}", encode_layout(game.layout()))?;
            writeln!(out, "summary {}", to_json(summary))?;
        }
        out.flush()
    }
}

fn write_events<W: Write>(out: &mut W, events: &[GameEvent]) -> io::Result<()> {
    for event in events {
        writeln!(out, "event {}", to_json(event))?;
    }
    out.flush()
}

fn reject<W: Write>(out: &mut W, reason: &dyn std::fmt::Display) -> io::Result<()> {
    debug!(%reason, "rejected");
    writeln!(out, "rejected {}", reason)?;
    out.flush()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!(error = %e, "failed to encode event");
        "null".to_string()
    })
}
