//! Error types for the decision engine

use thiserror::Error;
use tg_01_rights::RightsError;

use crate::domain::DeclarationKey;

/// Errors raised while compiling security declarations.
///
/// These surface when components are registered, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("Declaration {key} is invalid: {source}")]
    InvalidDeclaration {
        key: DeclarationKey,
        #[source]
        source: RightsError,
    },

    #[error(transparent)]
    Rights(#[from] RightsError),

    #[error("Malformed security declaration: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for DecisionError {
    fn from(e: serde_json::Error) -> Self {
        DecisionError::Malformed(e.to_string())
    }
}
