//! Domain layer: type graph, traversal and component descriptors.

pub mod component;
pub mod types;

pub use component::{Binding, ComponentDescriptor, Lifecycle};
pub use types::{Supertypes, TypeDescriptor, TypeGraph};
