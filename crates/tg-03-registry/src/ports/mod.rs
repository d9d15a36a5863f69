//! Ports layer: traits at the boundary with request handlers.

pub mod outbound;

pub use outbound::{Component, ComponentFactory, InstanceProvider, Invocation, StaticComponent};
