//! Turn continuation policy.

/// What happens to the turn after a player lands safely short of the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnPolicy {
    /// The player keeps moving until they fall, cross, or end the turn.
    #[default]
    ContinueUntilTerminal,
    /// Every safe step hands the turn to the next player in rotation.
    RotateEachMove,
}

impl TurnPolicy {
    /// Parses the `TurnPolicy` option value.
    pub fn from_option(value: &str) -> Option<TurnPolicy> {
        match value.to_ascii_lowercase().as_str() {
            "continue" => Some(TurnPolicy::ContinueUntilTerminal),
            "rotate" => Some(TurnPolicy::RotateEachMove),
            _ => None,
        }
    }

    /// The option value that selects this policy.
    pub const fn option_value(self) -> &'static str {
        match self {
            TurnPolicy::ContinueUntilTerminal => "continue",
            TurnPolicy::RotateEachMove => "rotate",
        }
    }

    /// Whether a safe, non-final step ends the player's turn.
    pub const fn rotates_after_safe_step(self) -> bool {
        matches!(self, TurnPolicy::RotateEachMove)
    }
}
