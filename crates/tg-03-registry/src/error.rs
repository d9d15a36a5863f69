//! Error types for the component registry

use shared_types::{ComponentId, TypeName};
use thiserror::Error;
use tg_02_decision::DecisionError;

/// Configuration errors detected while building a registry snapshot.
///
/// All of them are fatal at startup; none can surface while serving a
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Type {0} is registered twice")]
    DuplicateType(TypeName),

    #[error("Type {type_name} names unregistered supertype {supertype}")]
    UnknownSupertype {
        type_name: TypeName,
        supertype: TypeName,
    },

    #[error("Inheritance cycle through type {0}")]
    InheritanceCycle(TypeName),

    #[error("Component {0} is registered twice")]
    DuplicateComponent(ComponentId),

    #[error("Component {component} has unregistered type {type_name}")]
    UnknownType {
        component: ComponentId,
        type_name: TypeName,
    },

    #[error("Entry point {component}/{method} accepts no verbs")]
    EmptyVerbs { component: ComponentId, method: String },

    #[error("Entry point name {method:?} on {component} is not a single path segment")]
    InvalidEntryPoint { component: ComponentId, method: String },

    #[error("Malformed binding {interface} on component {component}: {reason}")]
    MalformedBinding {
        component: ComponentId,
        interface: TypeName,
        reason: String,
    },

    #[error(transparent)]
    Declaration(#[from] DecisionError),

    #[error("Malformed registry configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Config(e.to_string())
    }
}

/// Failure reported by a component while handling a call.
///
/// The dispatcher logs these in full and never forwards them to the caller.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Handler failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
