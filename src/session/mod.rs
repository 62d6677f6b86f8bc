//! Session bookkeeping.
//!
//! Records describing a session, the logger trait they are reported
//! through, and the clock that stamps them.

pub mod clock;
pub mod context;
pub mod logger;
pub mod record;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::SessionContext;
pub use logger::{
    JsonLinesLogger, LoggerError, MemoryLog, MemoryLogger, NullLogger, SessionLogger, SharedLogger,
};
pub use record::{elapsed_between, SessionId, SessionStart, SessionSummary};
