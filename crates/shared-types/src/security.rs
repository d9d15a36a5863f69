//! # Per-Request Security Types
//!
//! The [`SecurityContext`] is the only input the decision engine reads. It is
//! produced by an external authentication layer, confined to one request, and
//! never mutated while a decision is being evaluated.
//!
//! ## Denial Reasons
//!
//! Clients branch on the exact reason text, so the strings returned by
//! [`DenyReason::message`] must never change.

use crate::entities::{RightId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// IDENTITY
// =============================================================================

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// No authenticated session.
    Anonymous,
    /// An authenticated user.
    User(UserId),
}

impl Identity {
    /// Check if the identity is anonymous.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    /// The user id, if authenticated.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Identity::Anonymous => None,
            Identity::User(id) => Some(id),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Anonymous => f.write_str("anonymous"),
            Identity::User(id) => write!(f, "user:{}", id),
        }
    }
}

// =============================================================================
// SECURITY CONTEXT
// =============================================================================

/// Identity, held rights and ownership facts for one request.
///
/// Held rights are exact ids as granted to the user; they are never expanded
/// against the rights hierarchy here.
///
/// ## Usage
///
/// ```rust
/// use shared_types::{SecurityContext, UserId};
///
/// let ctx = SecurityContext::user("alice")
///     .with_right("CourseAdmin.Grades")
///     .with_resource_owner(UserId::new("alice"));
///
/// assert!(ctx.is_owner());
/// assert!(!ctx.is_anonymous());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityContext {
    identity: Option<UserId>,
    held_rights: HashSet<RightId>,
    resource_owner: Option<UserId>,
    asserted_identity: Option<UserId>,
}

impl SecurityContext {
    /// Context of an unauthenticated requester.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context of an authenticated user holding no rights yet.
    pub fn user(id: impl Into<UserId>) -> Self {
        Self {
            identity: Some(id.into()),
            ..Self::default()
        }
    }

    /// Add one held right.
    pub fn with_right(mut self, right: impl Into<RightId>) -> Self {
        self.held_rights.insert(right.into());
        self
    }

    /// Add several held rights.
    pub fn with_rights<I, R>(mut self, rights: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RightId>,
    {
        self.held_rights.extend(rights.into_iter().map(Into::into));
        self
    }

    /// Record the owner of the resource the request targets.
    pub fn with_resource_owner(mut self, owner: impl Into<UserId>) -> Self {
        self.resource_owner = Some(owner.into());
        self
    }

    /// Record the identity the caller claims to be acting as.
    pub fn with_asserted_identity(mut self, asserted: impl Into<UserId>) -> Self {
        self.asserted_identity = Some(asserted.into());
        self
    }

    /// The requester's identity.
    pub fn identity(&self) -> Identity {
        match &self.identity {
            Some(id) => Identity::User(id.clone()),
            None => Identity::Anonymous,
        }
    }

    /// The authenticated user, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    /// Check if no user is authenticated.
    pub fn is_anonymous(&self) -> bool {
        self.identity.is_none()
    }

    /// Rights held by the requester, exactly as granted.
    pub fn held_rights(&self) -> &HashSet<RightId> {
        &self.held_rights
    }

    /// Check if the requester holds exactly this right.
    pub fn holds(&self, right: &RightId) -> bool {
        self.held_rights.contains(right)
    }

    /// Owner of the targeted resource, if known.
    pub fn resource_owner(&self) -> Option<&UserId> {
        self.resource_owner.as_ref()
    }

    /// Identity asserted by the caller, if any.
    pub fn asserted_identity(&self) -> Option<&UserId> {
        self.asserted_identity.as_ref()
    }

    /// True iff the requester is authenticated and owns the targeted resource.
    pub fn is_owner(&self) -> bool {
        match (&self.identity, &self.resource_owner) {
            (Some(user), Some(owner)) => user == owner,
            _ => false,
        }
    }
}

// =============================================================================
// DECISIONS
// =============================================================================

/// Caller-facing cause of a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Anonymous requester or expired session.
    NotAuthenticated,
    /// Authenticated, but the required rights are not held.
    InsufficientRights,
    /// Authenticated as someone other than the identity the caller asserted.
    IdentityMismatch,
}

impl DenyReason {
    /// Exact text shown to the caller.
    pub const fn message(&self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "Not logged in or session expired",
            DenyReason::InsufficientRights => "Insufficient rights",
            DenyReason::IdentityMismatch => "Logged in as a different user",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a voter or decision manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Grant,
    Deny(DenyReason),
}

impl Decision {
    /// Check if access was granted.
    pub const fn is_granted(&self) -> bool {
        matches!(self, Decision::Grant)
    }

    /// Check if access was denied.
    pub const fn is_denied(&self) -> bool {
        !self.is_granted()
    }

    /// The denial reason, if denied.
    pub const fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Grant => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}
