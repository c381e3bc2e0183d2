//! Error types for scoring and the history store

use thiserror::Error;

/// Errors raised by the scoring engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// Text was missing, empty, or whitespace only
    #[error("invalid input: please provide content to analyze")]
    InvalidInput,
}

/// Errors raised by the history store
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("analysis not found: {0}")]
    NotFound(String),

    /// Record exists but belongs to another owner
    #[error("not authorized to access analysis {0}")]
    Forbidden(String),

    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
