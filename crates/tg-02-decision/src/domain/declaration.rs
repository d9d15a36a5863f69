//! Security declarations: the build-time description of who may call a
//! handler.
//!
//! # Example
//!
//! ```ignore
//! use tg_02_decision::{Combinator, SecurityDeclaration};
//! use tg_01_rights::MatchMode;
//!
//! let decl = SecurityDeclaration::new()
//!     .requiring("CourseAdmin")
//!     .with_match_mode(MatchMode::WithDescendants)
//!     .with_combinator(Combinator::Or)
//!     .by_owner();
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{RightId, TypeName};
use std::fmt;
use tg_01_rights::MatchMode;

use crate::error::DecisionError;

/// How the voters built from one declaration are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Every voter must grant.
    #[default]
    And,
    /// One granting voter suffices.
    Or,
}

/// Declarative access requirements attached to a type or method.
///
/// The default value declares no rights and rejects anonymous callers, i.e.
/// "any authenticated user".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityDeclaration {
    /// Required rights, in evaluation order
    pub required: Vec<RightId>,
    /// How each required right is matched against held rights
    pub match_mode: MatchMode,
    /// How the resulting voters are combined
    pub combinator: Combinator,
    /// Whether owning the targeted resource counts as a voter
    pub by_owner: bool,
    /// Whether anonymous callers may pass at all
    pub allow_anonymous: bool,
}

impl SecurityDeclaration {
    /// Create a declaration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A declaration that lets everyone through, anonymous callers included.
    pub fn public() -> Self {
        Self {
            allow_anonymous: true,
            ..Self::default()
        }
    }

    /// Parse a declaration from JSON.
    pub fn from_json(json: &str) -> Result<Self, DecisionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style method to add a required right
    pub fn requiring(mut self, right: impl Into<RightId>) -> Self {
        self.required.push(right.into());
        self
    }

    /// Builder-style method to set the match mode
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Builder-style method to set the combinator
    pub fn with_combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Builder-style method to add the ownership voter
    pub fn by_owner(mut self) -> Self {
        self.by_owner = true;
        self
    }

    /// Builder-style method to admit anonymous callers
    pub fn allowing_anonymous(mut self) -> Self {
        self.allow_anonymous = true;
        self
    }
}

/// Stable cache key: the type a declaration belongs to, plus the method for
/// method-level declarations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclarationKey {
    pub type_name: TypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl DeclarationKey {
    /// Key of a type-level declaration.
    pub fn for_type(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            method: None,
        }
    }

    /// Key of a method-level declaration.
    pub fn for_method(type_name: impl Into<TypeName>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: Some(method.into()),
        }
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{}#{}", self.type_name, method),
            None => write!(f, "{}", self.type_name),
        }
    }
}
