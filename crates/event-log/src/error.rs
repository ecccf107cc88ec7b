//! Event log error types.

use thiserror::Error;

/// Errors that can occur in the fallible helpers of this crate.
///
/// [`EventLogger::log_event`](crate::EventLogger::log_event) never returns
/// these; sink failures are reported through `tracing` and dropped.
#[derive(Debug, Error)]
pub enum EventLogError {
    /// A level label that is not one of `debug`, `info`, `warn`, `error`.
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for event log operations.
pub type EventLogResult<T> = Result<T, EventLogError>;
