//! Session configuration.
//!
//! `GameConfig` carries everything needed to set up a session. The engine
//! updates it through `setoption` commands; option names match the ones
//! announced in the handshake.

use std::time::Duration;

use crate::turn::TurnPolicy;

/// Default number of bridge rows.
pub const DEFAULT_BRIDGE_LENGTH: usize = 10;

/// Longest bridge a session accepts.
pub const MAX_BRIDGE_LENGTH: usize = 1000;

/// Default time for all players to cross.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(40);

/// Longest countdown a session accepts.
pub const MAX_TIME_LIMIT: Duration = Duration::from_secs(3600);

/// Errors that prevent a session from being created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("bridge must have at least one row")]
    EmptyBridge,

    #[error("at least one player is required")]
    EmptyRoster,

    #[error("duplicate player name '{0}'")]
    DuplicatePlayer(String),

    #[error("time limit must be positive")]
    ZeroTimeLimit,

    #[error("bridge of {0} rows exceeds the maximum of {MAX_BRIDGE_LENGTH}")]
    BridgeTooLong(usize),

    #[error("time limit exceeds the maximum of {} seconds", MAX_TIME_LIMIT.as_secs())]
    TimeLimitTooLong,

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },
}

/// Configuration for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of rows in the bridge.
    pub bridge_length: usize,
    /// Countdown length, started by the first step onto the bridge.
    pub time_limit: Duration,
    /// Whether a player keeps the turn after a safe step.
    pub turn_policy: TurnPolicy,
    /// Seed for layout generation (`None` = entropy).
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            bridge_length: DEFAULT_BRIDGE_LENGTH,
            time_limit: DEFAULT_TIME_LIMIT,
            turn_policy: TurnPolicy::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Checks the values a session cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bridge_length == 0 {
            return Err(ConfigError::EmptyBridge);
        }
        if self.bridge_length > MAX_BRIDGE_LENGTH {
            return Err(ConfigError::BridgeTooLong(self.bridge_length));
        }
        if self.time_limit.is_zero() {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.time_limit > MAX_TIME_LIMIT {
            return Err(ConfigError::TimeLimitTooLong);
        }
        Ok(())
    }

    /// Applies a named option. Option names are case-insensitive.
    ///
    /// `BridgeLength` takes a row count up to `MAX_BRIDGE_LENGTH`,
    /// `TimeLimit` seconds up to `MAX_TIME_LIMIT` (fractions allowed),
    /// `TurnPolicy` `continue` or `rotate`, `Seed` an integer (`0` clears
    /// it). A rejected value leaves the configuration unchanged.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name.to_ascii_lowercase().as_str() {
            "bridgelength" => {
                let rows: usize = value.parse().map_err(|_| invalid())?;
                if rows == 0 {
                    return Err(ConfigError::EmptyBridge);
                }
                if rows > MAX_BRIDGE_LENGTH {
                    return Err(invalid());
                }
                self.bridge_length = rows;
            }
            "timelimit" => {
                let secs: f64 = value.parse().map_err(|_| invalid())?;
                if !secs.is_finite() || secs < 0.0 {
                    return Err(invalid());
                }
                if secs == 0.0 {
                    return Err(ConfigError::ZeroTimeLimit);
                }
                let limit = Duration::try_from_secs_f64(secs).map_err(|_| invalid())?;
                if limit > MAX_TIME_LIMIT {
                    return Err(invalid());
                }
                self.time_limit = limit;
            }
            "turnpolicy" => {
                self.turn_policy = TurnPolicy::from_option(value).ok_or_else(invalid)?;
            }
            "seed" => {
                let seed: u64 = value.parse().map_err(|_| invalid())?;
                self.seed = if seed == 0 { None } else { Some(seed) };
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}
