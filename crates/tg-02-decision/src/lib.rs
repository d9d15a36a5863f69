//! # TG-02 Decision Engine
//!
//! Turns declarative security requirements into immutable, composable access
//! predicates and caches them.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `SecurityDeclaration`: required rights, match mode, combinator,
//!     ownership and anonymous-access flags
//!   - `Voter`: one atomic condition (`RightsVoter`, `OwnerVoter`, custom)
//!   - `DecisionManager`: voters combined with AND / OR / always-allow and an
//!     anonymous gate
//! - **Cache** (`cache.rs`): `DecisionCache`, one manager per declaration key
//! - **Checker** (`checker.rs`): `AccessChecker`, ad hoc checks through the cache
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: managers are pure and immutable; evaluating one never
//!   mutates shared state
//! - **INVARIANT-2**: voters are consulted in declaration order with
//!   short-circuit evaluation
//! - **INVARIANT-3**: at most one manager is ever cached per key
//!
//! ## Usage Example
//!
//! ```
//! use shared_types::{Decision, DenyReason, SecurityContext};
//! use tg_01_rights::RightsCatalogue;
//! use tg_02_decision::{DecisionManager, MatchMode, SecurityDeclaration};
//!
//! let rights = RightsCatalogue::from_dotted(["CourseAdmin.Grades"]).build().unwrap();
//! let decl = SecurityDeclaration::new()
//!     .requiring("CourseAdmin")
//!     .with_match_mode(MatchMode::WithDescendants);
//! let manager = DecisionManager::from_declaration(&decl, &rights).unwrap();
//!
//! let ta = SecurityContext::user("ta").with_right("CourseAdmin.Grades");
//! assert_eq!(manager.decide(&ta), Decision::Grant);
//! assert_eq!(
//!     manager.decide(&SecurityContext::anonymous()),
//!     Decision::Deny(DenyReason::NotAuthenticated)
//! );
//! ```

pub mod cache;
pub mod checker;
pub mod domain;
pub mod error;

// Re-exports for convenience
pub use cache::{CacheStats, DecisionCache};
pub use checker::AccessChecker;
pub use domain::{
    AccessVoter, Combinator, DeclarationKey, DecisionManager, OwnerVoter, RightsVoter,
    SecurityDeclaration, Voter,
};
pub use error::DecisionError;
pub use tg_01_rights::MatchMode;
