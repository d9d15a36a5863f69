//! # TG-01 Rights Hierarchy
//!
//! A tree of named rights in which holding a narrower right can satisfy a
//! requirement for the coarser right it descends from.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `RightsCatalogue`: ordered `{ id, parent? }` declarations loaded at startup
//!   - `RightsHierarchy`: validated, immutable tree with descendant closures
//!   - `RightMatcher`: a required right resolved for allocation-free checks
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: the right graph is a tree (no cycles, known parents)
//! - **INVARIANT-2**: matching is O(|held|) against a precomputed closure
//! - **INVARIANT-3**: an unknown required right is reported at build time,
//!   never while evaluating a request
//!
//! ## Usage Example
//!
//! ```
//! use tg_01_rights::{MatchMode, RightsCatalogue};
//! use shared_types::{RightId, SecurityContext};
//!
//! let rights = RightsCatalogue::from_dotted(["CourseAdmin.Grades"]).build().unwrap();
//! let matcher = rights
//!     .matcher(&RightId::new("CourseAdmin"), MatchMode::WithDescendants)
//!     .unwrap();
//!
//! let ctx = SecurityContext::user("alice").with_right("CourseAdmin.Grades");
//! assert!(matcher.matches(ctx.held_rights()));
//! ```

pub mod domain;
pub mod error;

// Re-exports for convenience
pub use domain::{
    MatchMode, RightEntry, RightMatcher, RightNode, RightSet, RightsCatalogue, RightsHierarchy,
};
pub use error::RightsError;
