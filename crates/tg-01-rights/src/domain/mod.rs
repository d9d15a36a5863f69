//! Domain layer: pure rights logic, no I/O.

pub mod catalogue;
pub mod hierarchy;
pub mod matching;

pub use catalogue::{RightEntry, RightsCatalogue};
pub use hierarchy::{RightNode, RightSet, RightsHierarchy};
pub use matching::{MatchMode, RightMatcher};
