//! Collaborators a controller needs from its host.

use super::clock::{Clock, SystemClock};
use super::logger::{NullLogger, SessionLogger};

/// Services owned by one game controller: where session records go and
/// where timestamps come from. Built once per session by the host.
pub struct SessionContext {
    pub logger: Box<dyn SessionLogger + Send>,
    pub clock: Box<dyn Clock + Send>,
}

impl SessionContext {
    pub fn new(logger: impl SessionLogger + Send + 'static, clock: impl Clock + Send + 'static) -> Self {
        SessionContext {
            logger: Box::new(logger),
            clock: Box::new(clock),
        }
    }

    /// Uses the system clock with the given logger.
    pub fn with_logger(logger: impl SessionLogger + Send + 'static) -> Self {
        Self::new(logger, SystemClock)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(NullLogger, SystemClock)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}
