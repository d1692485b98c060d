//! Logging setup errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The filter directive could not be parsed
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// An unknown output format name
    #[error("unknown log format `{0}` (expected pretty, compact or json)")]
    Format(String),

    /// A global subscriber is already installed
    #[error("logger initialization failed: {0}")]
    Init(String),
}

pub type LogResult<T> = Result<T, LogError>;
