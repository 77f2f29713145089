//! History-sink abstraction and SQLite journal.

/// SQLite-backed implementation.
pub mod sqlite;

use thiserror::Error;

use crate::{core::game::MatchError, record::ThrowRecord, types::ThrowSeq};

/// Failure while journaling or replaying throw history.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Payload encode/decode failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Anything else, including corrupt journals.
    #[error("{0}")]
    Message(String),
}

impl From<MatchError> for PersistError {
    fn from(value: MatchError) -> Self {
        Self::Message(format!("journal replay rejected: {value}"))
    }
}

/// Convenience alias for persistence results.
pub type PersistResult<T> = Result<T, PersistError>;

/// Append-only audit/replay sink for accepted throws.
///
/// A match runs fully in memory without one; tests may plug a no-op.
pub trait HistorySink: Send {
    /// Appends records in order, returning the highest durable sequence.
    fn append_throws(&mut self, records: &[ThrowRecord]) -> PersistResult<ThrowSeq>;

    /// Makes previously appended records durable. No-op by default.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
