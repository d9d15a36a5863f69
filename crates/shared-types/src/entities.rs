//! # Core Domain Entities
//!
//! Identifiers shared by the rights model, the component registry and the
//! dispatcher.
//!
//! ## Clusters
//!
//! - **Rights**: `RightId`
//! - **Principals**: `UserId`
//! - **Components**: `ComponentId`, `TypeName`, `HttpVerb`

use crate::errors::EntityError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Defines an immutable, cheaply clonable string identifier.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl AsRef<str>) -> Self {
                Self(Arc::from(id.as_ref()))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True if the identifier is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), &*self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(Arc::from(id))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

// =============================================================================
// CLUSTER A: RIGHTS
// =============================================================================

string_id! {
    /// Globally unique identifier of a right, e.g. `"CourseAdmin.Grades"`.
    RightId
}

impl RightId {
    /// The id this right would have as a child in dotted notation, if any.
    ///
    /// `"CourseAdmin.Grades"` → `Some("CourseAdmin")`, `"CourseAdmin"` → `None`.
    pub fn dotted_parent(&self) -> Option<RightId> {
        self.0.rsplit_once('.').map(|(parent, _)| RightId::new(parent))
    }
}

// =============================================================================
// CLUSTER B: PRINCIPALS
// =============================================================================

string_id! {
    /// Identifier of an authenticated user.
    UserId
}

// =============================================================================
// CLUSTER C: COMPONENTS
// =============================================================================

string_id! {
    /// Identifier under which a component is reachable by the dispatcher.
    ComponentId
}

string_id! {
    /// Name of a type node in the component type graph.
    TypeName
}

/// Request verb accepted by an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    /// All verbs, in canonical order.
    pub const ALL: [HttpVerb; 5] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Patch,
        HttpVerb::Delete,
    ];

    /// Canonical upper-case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Check if the verb is expected to mutate state.
    pub const fn is_write(&self) -> bool {
        !matches!(self, HttpVerb::Get)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpVerb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| EntityError::UnknownVerb(s.to_string()))
    }
}
