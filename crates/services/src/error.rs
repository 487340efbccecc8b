//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{ModeError, QuestionError};

/// Errors emitted while loading the question pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("invalid question source URL: {0}")]
    InvalidUrl(String),
    #[error("question source request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question document is malformed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read question document: {0}")]
    Io(#[from] std::io::Error),
    /// Every record in the document failed validation; carries the first.
    #[error("question #{index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Errors emitted by the session runner.
///
/// None of these change the runner's state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no mode is being configured")]
    NotConfiguring,
    #[error("no test is running")]
    NotRunning,
    #[error("a test is already in progress or finished; reset first")]
    SessionActive,
    #[error("question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Mode(#[from] ModeError),
}
