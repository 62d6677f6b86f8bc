//! Session logger interface and adapters.
//!
//! The game records each session twice: once when it starts and once when it
//! ends. Loggers may fail; the controller logs the failure and carries on,
//! so nothing here can change how a game plays out.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use super::record::{SessionId, SessionStart, SessionSummary};

/// Errors a session logger can report.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("session logger unavailable: {0}")]
    Unavailable(String),

    #[error("session log write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session record encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for session records.
pub trait SessionLogger {
    /// Records a new session and returns its id.
    fn record_session_start(&mut self, start: &SessionStart) -> Result<SessionId, LoggerError>;

    /// Records the final result of a session started earlier.
    fn record_session_end(
        &mut self,
        id: SessionId,
        summary: &SessionSummary,
    ) -> Result<(), LoggerError>;
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl SessionLogger for NullLogger {
    fn record_session_start(&mut self, _start: &SessionStart) -> Result<SessionId, LoggerError> {
        Ok(SessionId(0))
    }

    fn record_session_end(
        &mut self,
        _id: SessionId,
        _summary: &SessionSummary,
    ) -> Result<(), LoggerError> {
        Ok(())
    }
}

/// Records kept by a [`MemoryLogger`].
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    pub starts: Vec<(SessionId, SessionStart)>,
    pub ends: Vec<(SessionId, SessionSummary)>,
}

/// Keeps records in memory. Clones share the same log, so a caller can hand
/// one clone to a controller and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    log: Arc<Mutex<MemoryLog>>,
    unavailable: bool,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger that rejects every call, standing in for a lost backend.
    pub fn unavailable() -> Self {
        MemoryLogger {
            log: Arc::default(),
            unavailable: true,
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn snapshot(&self) -> MemoryLog {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryLog> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<(), LoggerError> {
        if self.unavailable {
            return Err(LoggerError::Unavailable("memory logger disabled".to_string()));
        }
        Ok(())
    }
}

impl SessionLogger for MemoryLogger {
    fn record_session_start(&mut self, start: &SessionStart) -> Result<SessionId, LoggerError> {
        self.check_available()?;
        let mut log = self.lock();
        let id = SessionId(log.starts.len() as u64 + 1);
        log.starts.push((id, start.clone()));
        Ok(id)
    }

    fn record_session_end(
        &mut self,
        id: SessionId,
        summary: &SessionSummary,
    ) -> Result<(), LoggerError> {
        self.check_available()?;
        self.lock().ends.push((id, summary.clone()));
        Ok(())
    }
}

/// A logger shared between the sessions of one engine. Each controller
/// gets a clone; calls are serialized through the lock.
#[derive(Clone)]
pub struct SharedLogger {
    inner: Arc<Mutex<Box<dyn SessionLogger + Send>>>,
}

impl SharedLogger {
    pub fn new(logger: impl SessionLogger + Send + 'static) -> Self {
        SharedLogger {
            inner: Arc::new(Mutex::new(Box::new(logger))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn SessionLogger + Send>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SharedLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLogger").finish_non_exhaustive()
    }
}

impl SessionLogger for SharedLogger {
    fn record_session_start(&mut self, start: &SessionStart) -> Result<SessionId, LoggerError> {
        self.lock().record_session_start(start)
    }

    fn record_session_end(
        &mut self,
        id: SessionId,
        summary: &SessionSummary,
    ) -> Result<(), LoggerError> {
        self.lock().record_session_end(id, summary)
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum LogLine<'a> {
    Start {
        session_id: SessionId,
        #[serde(flatten)]
        start: &'a SessionStart,
    },
    End {
        #[serde(flatten)]
        summary: &'a SessionSummary,
    },
}

/// Appends one JSON object per record to a writer (JSONL).
///
/// Session ids count up from `first_id`.
pub struct JsonLinesLogger<W: Write> {
    out: W,
    next_id: u64,
}

impl<W: Write> JsonLinesLogger<W> {
    pub fn new(out: W) -> Self {
        Self::with_first_id(out, 1)
    }

    pub fn with_first_id(out: W, first_id: u64) -> Self {
        JsonLinesLogger { out, next_id: first_id }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &LogLine<'_>) -> Result<(), LoggerError> {
        serde_json::to_writer(&mut self.out, line)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> SessionLogger for JsonLinesLogger<W> {
    fn record_session_start(&mut self, start: &SessionStart) -> Result<SessionId, LoggerError> {
        let id = SessionId(self.next_id);
        self.write_line(&LogLine::Start { session_id: id, start })?;
        self.next_id += 1;
        Ok(id)
    }

    fn record_session_end(
        &mut self,
        id: SessionId,
        summary: &SessionSummary,
    ) -> Result<(), LoggerError> {
        debug_assert_eq!(summary.session_id, Some(id));
        self.write_line(&LogLine::End { summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BridgeLayout, Side};
    use std::time::Duration;
    use time::OffsetDateTime;

    fn start() -> SessionStart {
        SessionStart {
            start_time: OffsetDateTime::UNIX_EPOCH,
            players_selected: vec!["A".into(), "B".into()],
            layout: BridgeLayout::from_safe_sides(vec![Side::Left, Side::Right]).unwrap(),
        }
    }

    fn summary(id: SessionId) -> SessionSummary {
        let s = start();
        SessionSummary {
            session_id: Some(id),
            start_time: s.start_time,
            end_time: s.start_time + time::Duration::seconds(4),
            duration: Duration::from_secs(4),
            players_selected: s.players_selected.clone(),
            players_crossed: vec![],
            players_fallen: vec!["A".into(), "B".into()],
            time_limit_reached: true,
            layout: s.layout,
        }
    }

    #[test]
    fn memory_logger_shares_log_between_clones() {
        let logger = MemoryLogger::new();
        let mut handle = logger.clone();
        let id = handle.record_session_start(&start()).unwrap();
        assert_eq!(id, SessionId(1));
        handle.record_session_end(id, &summary(id)).unwrap();

        let log = logger.snapshot();
        assert_eq!(log.starts.len(), 1);
        assert_eq!(log.ends.len(), 1);
        assert_eq!(log.ends[0].0, id);
    }

    #[test]
    fn unavailable_memory_logger_fails() {
        let mut logger = MemoryLogger::unavailable();
        assert!(matches!(
            logger.record_session_start(&start()),
            Err(LoggerError::Unavailable(_))
        ));
        assert!(logger.record_session_end(SessionId(1), &summary(SessionId(1))).is_err());
        assert!(logger.snapshot().starts.is_empty());
    }

    #[test]
    fn json_lines_logger_writes_one_object_per_record() {
        let mut logger = JsonLinesLogger::with_first_id(Vec::new(), 10);
        let id = logger.record_session_start(&start()).unwrap();
        assert_eq!(id, SessionId(10));
        logger.record_session_end(id, &summary(id)).unwrap();

        let text = String::from_utf8(logger.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "start");
        assert_eq!(lines[0]["session_id"], 10);
        assert_eq!(lines[0]["players_selected"], serde_json::json!(["A", "B"]));
        assert_eq!(lines[0]["bridge_layout"], serde_json::json!([[true, false], [false, true]]));
        assert_eq!(lines[1]["event"], "end");
        assert_eq!(lines[1]["session_id"], 10);
        assert_eq!(lines[1]["time_limit_reached"], true);
        assert_eq!(lines[1]["players_fallen"], serde_json::json!(["A", "B"]));
    }

    #[test]
    fn shared_logger_forwards_to_inner_logger() {
        let memory = MemoryLogger::new();
        let shared = SharedLogger::new(memory.clone());
        let mut a = shared.clone();
        let mut b = shared;
        let first = a.record_session_start(&start()).unwrap();
        let second = b.record_session_start(&start()).unwrap();
        assert_eq!((first, second), (SessionId(1), SessionId(2)));
        assert_eq!(memory.snapshot().starts.len(), 2);
    }

    #[test]
    fn null_logger_accepts_everything() {
        let mut logger = NullLogger;
        let id = logger.record_session_start(&start()).unwrap();
        assert!(logger.record_session_end(id, &summary(id)).is_ok());
    }
}
