//! Error types for the leaderboard engine.

use shared::ErrorKind;
use std::io;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures surfaced by the storage and ranking engine.
///
/// None of these are retried internally; callers see each one as a
/// distinguishable outcome. A submission whose score does not qualify is
/// not an error at all — it returns the unchanged leaderboard.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The table identifier is not in the configured registry.
    #[error("table '{table}' not found")]
    NotFound {
        /// The rejected identifier, after normalization.
        table: String,
    },

    /// The submission's binding proof is missing or does not match.
    #[error("submission proof mismatch")]
    Forbidden,

    /// The on-disk table file does not parse.
    #[error("table '{table}' is corrupt: {reason}")]
    CorruptData {
        /// Table whose file failed to parse.
        table: String,
        /// What the parser tripped over.
        reason: String,
    },

    /// I/O failure reading or writing a table file.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] io::Error),
}

impl EngineError {
    /// The wire-level category for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Forbidden => ErrorKind::Forbidden,
            EngineError::CorruptData { .. } => ErrorKind::CorruptData,
            EngineError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// True for faults the client caused (bad table, bad proof).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::NotFound { .. } | EngineError::Forbidden
        )
    }
}
