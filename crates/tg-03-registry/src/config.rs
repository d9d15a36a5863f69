//! Registry configuration.

use serde::{Deserialize, Serialize};
use shared_types::{Decision, DenyReason, SecurityContext};

use crate::error::RegistryError;

/// What `check_access` does for a method no declaration covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndeclaredPolicy {
    /// Deny everyone: anonymous callers with `NotAuthenticated`, users with
    /// `InsufficientRights`.
    #[default]
    Deny,
    /// Grant everyone, anonymous callers included.
    Allow,
}

impl UndeclaredPolicy {
    pub fn decide(&self, ctx: &SecurityContext) -> Decision {
        match self {
            UndeclaredPolicy::Allow => Decision::Grant,
            UndeclaredPolicy::Deny if ctx.is_anonymous() => {
                Decision::Deny(DenyReason::NotAuthenticated)
            }
            UndeclaredPolicy::Deny => Decision::Deny(DenyReason::InsufficientRights),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub undeclared_policy: UndeclaredPolicy,
}

impl RegistryConfig {
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style method to set the undeclared policy
    pub fn with_undeclared_policy(mut self, policy: UndeclaredPolicy) -> Self {
        self.undeclared_policy = policy;
        self
    }
}
