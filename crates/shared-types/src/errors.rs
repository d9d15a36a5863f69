//! # Error Types
//!
//! Errors raised while constructing shared entities.

use thiserror::Error;

/// Errors that can occur when parsing shared entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// Verb is not one of the supported request verbs.
    #[error("Unknown request verb: {0}")]
    UnknownVerb(String),
}
