//! Session records handed to the session logger.

use std::time::Duration;

use serde::{Serialize, Serializer};
use time::OffsetDateTime;

use crate::board::BridgeLayout;

/// Identifier a logger assigns to a recorded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What is known when a session begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStart {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub players_selected: Vec<String>,
    #[serde(rename = "bridge_layout")]
    pub layout: BridgeLayout,
}

/// Final result of a session, produced once at game over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// `None` when the logger could not record the session start.
    pub session_id: Option<SessionId>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    #[serde(rename = "duration_seconds", serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub players_selected: Vec<String>,
    pub players_crossed: Vec<String>,
    pub players_fallen: Vec<String>,
    pub time_limit_reached: bool,
    #[serde(rename = "bridge_layout")]
    pub layout: BridgeLayout,
}

impl SessionSummary {
    /// Players who made it across.
    pub fn winners(&self) -> &[String] {
        &self.players_crossed
    }
}

pub(crate) fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Wall-clock time between two timestamps, zero if `end` precedes `start`.
pub fn elapsed_between(start: OffsetDateTime, end: OffsetDateTime) -> Duration {
    Duration::try_from(end - start).unwrap_or(Duration::ZERO)
}
