//! Right matching against a held-rights set.
//!
//! - `Exact`: satisfied iff the required right is held.
//! - `WithDescendants`: also satisfied when a held right lies below the
//!   required one, i.e. a narrower right implies the coarser capability it
//!   descends from.
//!
//! The check walks the held set once against the precomputed closure of the
//! required right, so it is O(|held|) and never allocates.

use crate::domain::hierarchy::RightSet;
use serde::{Deserialize, Serialize};
use shared_types::RightId;
use std::fmt;
use std::sync::Arc;

/// How a required right is compared with held rights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Only the right itself satisfies the requirement.
    #[default]
    Exact,
    /// The right itself or any of its descendants satisfies the requirement.
    WithDescendants,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Exact => f.write_str("exact"),
            MatchMode::WithDescendants => f.write_str("with_descendants"),
        }
    }
}

/// A required right resolved against the hierarchy.
///
/// Holds its own handle on the descendant closure, so evaluation needs no
/// access to the hierarchy and cannot fail.
#[derive(Clone, Debug)]
pub struct RightMatcher {
    right: RightId,
    mode: MatchMode,
    descendants: Arc<RightSet>,
}

impl RightMatcher {
    pub(crate) fn new(right: RightId, mode: MatchMode, descendants: Arc<RightSet>) -> Self {
        Self {
            right,
            mode,
            descendants,
        }
    }

    /// The required right.
    pub fn right(&self) -> &RightId {
        &self.right
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Evaluate against the rights a requester holds.
    pub fn matches(&self, held: &RightSet) -> bool {
        if held.contains(&self.right) {
            return true;
        }
        match self.mode {
            MatchMode::Exact => false,
            MatchMode::WithDescendants => held.iter().any(|h| self.descendants.contains(h)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RightsCatalogue;

    fn held(ids: &[&str]) -> RightSet {
        ids.iter().map(|s| RightId::new(s)).collect()
    }

    #[test]
    fn test_exact_requires_the_right_itself() {
        let rights = RightsCatalogue::from_dotted(["CourseAdmin.Grades"]).build().unwrap();
        let matcher = rights
            .matcher(&RightId::new("CourseAdmin"), MatchMode::Exact)
            .unwrap();

        assert!(matcher.matches(&held(&["CourseAdmin"])));
        assert!(!matcher.matches(&held(&["CourseAdmin.Grades"])));
        assert!(!matcher.matches(&held(&[])));
    }

    #[test]
    fn test_with_descendants_accepts_narrower_rights() {
        let rights = RightsCatalogue::from_dotted(["CourseAdmin.Grades.Export", "Reports"])
            .build()
            .unwrap();
        let matcher = rights
            .matcher(&RightId::new("CourseAdmin"), MatchMode::WithDescendants)
            .unwrap();

        assert!(matcher.matches(&held(&["CourseAdmin"])));
        assert!(matcher.matches(&held(&["CourseAdmin.Grades"])));
        assert!(matcher.matches(&held(&["Reports", "CourseAdmin.Grades.Export"])));
        assert!(!matcher.matches(&held(&["Reports"])));
    }

    #[test]
    fn test_ancestors_do_not_satisfy_narrower_requirement() {
        let rights = RightsCatalogue::from_dotted(["CourseAdmin.Grades"]).build().unwrap();
        let matcher = rights
            .matcher(&RightId::new("CourseAdmin.Grades"), MatchMode::WithDescendants)
            .unwrap();
        assert!(!matcher.matches(&held(&["CourseAdmin"])));
    }

    #[test]
    fn test_one_shot_matches() {
        let rights = RightsCatalogue::from_dotted(["A.B"]).build().unwrap();
        assert!(rights
            .matches(&RightId::new("A"), MatchMode::WithDescendants, &held(&["A.B"]))
            .unwrap());
        assert!(!rights
            .matches(&RightId::new("A"), MatchMode::Exact, &held(&["A.B"]))
            .unwrap());
    }

    #[test]
    fn test_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&MatchMode::WithDescendants).unwrap(),
            "\"with_descendants\""
        );
        assert_eq!(MatchMode::default(), MatchMode::Exact);
    }
}
