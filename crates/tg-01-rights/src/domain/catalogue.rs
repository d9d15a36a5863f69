//! Rights catalogue: the startup input the hierarchy is built from.
//!
//! # Example
//!
//! ```ignore
//! use tg_01_rights::RightsCatalogue;
//!
//! let hierarchy = RightsCatalogue::new()
//!     .with_root("CourseAdmin")
//!     .with_child("CourseAdmin.Grades", "CourseAdmin")
//!     .build()?;
//! ```

use crate::domain::hierarchy::RightsHierarchy;
use crate::error::RightsError;
use serde::{Deserialize, Serialize};
use shared_types::RightId;
use std::collections::HashSet;

/// One declared right and its optional parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightEntry {
    /// Globally unique right id
    pub id: RightId,
    /// Parent right, `None` for a root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RightId>,
}

impl RightEntry {
    /// A root right.
    pub fn root(id: impl Into<RightId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
        }
    }

    /// A right nested under `parent`.
    pub fn child(id: impl Into<RightId>, parent: impl Into<RightId>) -> Self {
        Self {
            id: id.into(),
            parent: Some(parent.into()),
        }
    }
}

/// Ordered list of declared rights.
///
/// Order matters: children of a node are kept in catalogue order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RightsCatalogue {
    entries: Vec<RightEntry>,
}

impl RightsCatalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalogue from a JSON array of `{ "id": .., "parent": .. }`.
    pub fn from_json(json: &str) -> Result<Self, RightsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Derive a catalogue from dotted right ids.
    ///
    /// `"CourseAdmin.Grades"` becomes a child of `"CourseAdmin"`. Ancestors
    /// that are only implied by a dotted id are declared automatically,
    /// ahead of their descendants.
    pub fn from_dotted<I, R>(ids: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RightId>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for id in ids {
            let id = id.into();
            let mut chain = vec![id.clone()];
            let mut cursor = id.dotted_parent();
            while let Some(parent) = cursor {
                cursor = parent.dotted_parent();
                chain.push(parent);
            }

            for right in chain.into_iter().rev() {
                if seen.insert(right.clone()) {
                    let parent = right.dotted_parent();
                    entries.push(RightEntry { id: right, parent });
                }
            }
        }

        Self { entries }
    }

    /// Builder-style method to add a root right
    pub fn with_root(mut self, id: impl Into<RightId>) -> Self {
        self.entries.push(RightEntry::root(id));
        self
    }

    /// Builder-style method to add a child right
    pub fn with_child(mut self, id: impl Into<RightId>, parent: impl Into<RightId>) -> Self {
        self.entries.push(RightEntry::child(id, parent));
        self
    }

    /// Append an entry.
    pub fn push(&mut self, entry: RightEntry) {
        self.entries.push(entry);
    }

    /// Declared entries in order.
    pub fn entries(&self) -> &[RightEntry] {
        &self.entries
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate the catalogue and build the immutable hierarchy.
    pub fn build(&self) -> Result<RightsHierarchy, RightsError> {
        RightsHierarchy::build(self)
    }
}

impl FromIterator<RightEntry> for RightsCatalogue {
    fn from_iter<T: IntoIterator<Item = RightEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
