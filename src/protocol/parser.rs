//! Command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the engine loop can dispatch on.

use tracing::debug;

use super::notation::{parse_layout, parse_side, NotationError};
use crate::board::{BridgeLayout, Side};

/// Errors produced for lines that are not valid commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("malformed {command}: expected '{usage}'")]
    Malformed {
        command: &'static str,
        usage: &'static str,
    },

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("invalid tick value '{0}'")]
    InvalidTick(String),
}

/// A parsed host-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake.
    Gbi,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Fix the layout of the next session instead of drawing one.
    SetLayout { layout: BridgeLayout },

    /// Start a session with the named players, in turn order.
    NewGame { players: Vec<String> },

    /// The current player steps onto a tile of their next row.
    Move { side: Side },

    /// The current player hands the turn on.
    EndTurn,

    /// Advance the countdown by the given number of milliseconds.
    Tick { millis: u64 },

    /// Report the current session state.
    Status,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Err(ParseError::Empty);
    };

    let cmd = match head {
        "gbi" => Command::Gbi,
        "isready" => Command::IsReady,
        "quit" => Command::Quit,
        "endturn" => Command::EndTurn,
        "status" => Command::Status,

        "setoption" => parse_setoption(&tokens)?,
        "setlayout" => parse_setlayout(&tokens)?,
        "newgame" => parse_newgame(&tokens)?,
        "move" => parse_move(&tokens)?,
        "tick" => parse_tick(&tokens)?,

        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    debug!(?cmd, "parsed command");
    Ok(cmd)
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, ParseError> {
    const MALFORMED: ParseError = ParseError::Malformed {
        command: "setoption",
        usage: "setoption name <id> [value <x>]",
    };
    if tokens.len() < 3 || tokens[1] != "name" {
        return Err(MALFORMED);
    }

    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                return Err(MALFORMED);
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Ok(Command::SetOption { name, value })
}

/// Parses `setlayout <notation>`.
fn parse_setlayout(tokens: &[&str]) -> Result<Command, ParseError> {
    if tokens.len() != 2 {
        return Err(ParseError::Malformed {
            command: "setlayout",
            usage: "setlayout <notation>",
        });
    }
    let layout = parse_layout(tokens[1])?;
    Ok(Command::SetLayout { layout })
}

/// Parses `newgame <name> [<name>...]`.
fn parse_newgame(tokens: &[&str]) -> Result<Command, ParseError> {
    if tokens.len() < 2 {
        return Err(ParseError::Malformed {
            command: "newgame",
            usage: "newgame <name> [<name>...]",
        });
    }
    let players = tokens[1..].iter().map(|s| s.to_string()).collect();
    Ok(Command::NewGame { players })
}

/// Parses `move <side>`.
fn parse_move(tokens: &[&str]) -> Result<Command, ParseError> {
    if tokens.len() != 2 {
        return Err(ParseError::Malformed {
            command: "move",
            usage: "move <l|r>",
        });
    }
    let side = parse_side(tokens[1])?;
    Ok(Command::Move { side })
}

/// Parses `tick <ms>`.
fn parse_tick(tokens: &[&str]) -> Result<Command, ParseError> {
    if tokens.len() != 2 {
        return Err(ParseError::Malformed {
            command: "tick",
            usage: "tick <ms>",
        });
    }
    let millis = tokens[1]
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidTick(tokens[1].to_string()))?;
    Ok(Command::Tick { millis })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("gbi"), Ok(Command::Gbi));
        assert_eq!(parse_command("isready"), Ok(Command::IsReady));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("endturn"), Ok(Command::EndTurn));
        assert_eq!(parse_command("status"), Ok(Command::Status));
    }

    #[test]
    fn parse_empty_line() {
        assert_eq!(parse_command(""), Err(ParseError::Empty));
        assert_eq!(parse_command("  "), Err(ParseError::Empty));
        assert_eq!(parse_command("\t"), Err(ParseError::Empty));
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(
            parse_command("foobar"),
            Err(ParseError::UnknownCommand("foobar".to_string()))
        );
    }

    #[test]
    fn parse_setoption_with_value() {
        assert_eq!(
            parse_command("setoption name BridgeLength value 3"),
            Ok(Command::SetOption {
                name: "BridgeLength".to_string(),
                value: Some("3".to_string()),
            })
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        assert_eq!(
            parse_command("setoption name Seed"),
            Ok(Command::SetOption {
                name: "Seed".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn parse_setoption_malformed() {
        assert!(matches!(parse_command("setoption"), Err(ParseError::Malformed { .. })));
        assert!(matches!(parse_command("setoption foo"), Err(ParseError::Malformed { .. })));
        assert!(matches!(
            parse_command("setoption name value 3"),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn parse_setlayout() {
        let cmd = parse_command("setlayout LRL").unwrap();
        assert_eq!(
            cmd,
            Command::SetLayout {
                layout: parse_layout("LRL").unwrap()
            }
        );
        assert_eq!(
            parse_command("setlayout LQ"),
            Err(ParseError::Notation(NotationError::InvalidLayoutChar { ch: 'Q', row: 1 }))
        );
        assert!(matches!(parse_command("setlayout"), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn parse_newgame_players() {
        assert_eq!(
            parse_command("newgame A B C"),
            Ok(Command::NewGame {
                players: vec!["A".into(), "B".into(), "C".into()]
            })
        );
        assert!(matches!(parse_command("newgame"), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn parse_move_sides() {
        assert_eq!(parse_command("move l"), Ok(Command::Move { side: Side::Left }));
        assert_eq!(parse_command("move 2"), Ok(Command::Move { side: Side::Right }));
        assert_eq!(
            parse_command("move up"),
            Err(ParseError::Notation(NotationError::InvalidSide("up".into())))
        );
        assert!(matches!(parse_command("move"), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn parse_tick_millis() {
        assert_eq!(parse_command("tick 250"), Ok(Command::Tick { millis: 250 }));
        assert_eq!(parse_command("tick -1"), Err(ParseError::InvalidTick("-1".into())));
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  gbi  "), Ok(Command::Gbi));
        assert_eq!(parse_command("  move   r "), Ok(Command::Move { side: Side::Right }));
    }
}
