//! Error types for the Rights Hierarchy

use shared_types::RightId;
use thiserror::Error;

/// Configuration errors raised while building or querying the rights tree.
///
/// All of these are startup failures; none can occur while a request is
/// being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RightsError {
    #[error("Right id must not be empty")]
    EmptyId,

    #[error("Right declared twice: {0}")]
    DuplicateRight(RightId),

    #[error("Right {right} names unknown parent {parent}")]
    UnknownParent { right: RightId, parent: RightId },

    #[error("Right {0} is part of a parent cycle")]
    Cycle(RightId),

    #[error("Right not registered: {0}")]
    UnknownRight(RightId),

    #[error("Malformed rights catalogue: {0}")]
    Catalogue(String),
}

impl From<serde_json::Error> for RightsError {
    fn from(e: serde_json::Error) -> Self {
        RightsError::Catalogue(e.to_string())
    }
}
