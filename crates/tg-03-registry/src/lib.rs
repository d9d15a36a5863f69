//! # TG-03 Component Registry
//!
//! Maps component ids to descriptors and decides, before any handler code
//! runs, whether a caller may invoke a method.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`)
//!   - `TypeGraph`: types with superclass/interface edges and declarations,
//!     traversed breadth-first by `supertypes()`
//!   - `ComponentDescriptor`: id, type, bindings, entry points, instances
//! - **Ports Layer** (`ports/`)
//!   - `Component`: async handler invoked after access is granted
//! - **Snapshot** (`snapshot.rs`): validated routing state with every
//!   declaration compiled, plus `check_access`
//! - **Registry** (`registry.rs`): the current snapshot behind an atomic swap
//!
//! ## Access check
//!
//! 1. An asserted identity must match the authenticated one
//!    (`NotAuthenticated` if anonymous, `IdentityMismatch` otherwise).
//! 2. The nearest method-level declaration for the method wins, then the
//!    nearest type-level one, in supertype traversal order.
//! 3. Without any declaration, the configured `UndeclaredPolicy` decides
//!    (deny by default).
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: every declaration is compiled when the snapshot is
//!   built; request-time checks never hit a configuration error
//! - **INVARIANT-2**: a snapshot never changes after construction
//! - **INVARIANT-3**: `Registry::replace` swaps the whole mapping at once

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod registry;
pub mod snapshot;

// Re-exports for convenience
pub use config::{RegistryConfig, UndeclaredPolicy};
pub use domain::{
    Binding, ComponentDescriptor, Lifecycle, Supertypes, TypeDescriptor, TypeGraph,
};
pub use error::{HandlerError, RegistryError};
pub use ports::{Component, ComponentFactory, InstanceProvider, Invocation, StaticComponent};
pub use registry::Registry;
pub use snapshot::{RegistryBuilder, RegistrySnapshot};
