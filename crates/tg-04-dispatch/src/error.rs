//! Error types for the dispatcher

use thiserror::Error;

/// Why a request path could not be split. Logged only; callers always see
/// NotFound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Path has no component segment")]
    MissingComponent,

    #[error("Path has no function segment")]
    MissingFunction,

    #[error("Path is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Invalid dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid error message: {0}")]
    InvalidMessage(String),

    #[error("Malformed dispatcher configuration: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Malformed(e.to_string())
    }
}
