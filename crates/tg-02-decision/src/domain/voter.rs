//! Voters: atomic, pure predicates over a [`SecurityContext`].

use shared_types::{Decision, DenyReason, RightId, SecurityContext};
use std::fmt;
use std::sync::Arc;
use tg_01_rights::{MatchMode, RightMatcher, RightsHierarchy};

use crate::error::DecisionError;

/// A single authorization condition.
///
/// Implementations must be pure: same context in, same decision out, no side
/// effects and no blocking.
pub trait AccessVoter: Send + Sync + fmt::Debug {
    fn decide(&self, ctx: &SecurityContext) -> Decision;
}

/// Grants iff the context holds the required right (or, in
/// `WithDescendants` mode, one of its descendants).
#[derive(Clone, Debug)]
pub struct RightsVoter {
    matcher: RightMatcher,
}

impl RightsVoter {
    /// Resolve `right` against the hierarchy.
    pub fn new(
        right: &RightId,
        mode: MatchMode,
        rights: &RightsHierarchy,
    ) -> Result<Self, DecisionError> {
        Ok(Self {
            matcher: rights.matcher(right, mode)?,
        })
    }

    pub fn right(&self) -> &RightId {
        self.matcher.right()
    }

    pub fn mode(&self) -> MatchMode {
        self.matcher.mode()
    }
}

impl AccessVoter for RightsVoter {
    fn decide(&self, ctx: &SecurityContext) -> Decision {
        if self.matcher.matches(ctx.held_rights()) {
            Decision::Grant
        } else {
            Decision::Deny(DenyReason::InsufficientRights)
        }
    }
}

/// Grants iff the requester owns the targeted resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OwnerVoter;

impl AccessVoter for OwnerVoter {
    fn decide(&self, ctx: &SecurityContext) -> Decision {
        if ctx.is_owner() {
            Decision::Grant
        } else {
            Decision::Deny(DenyReason::InsufficientRights)
        }
    }
}

/// Any voter a decision manager can hold.
///
/// The built-in voters are matched statically; `Custom` is the extension
/// point for call sites that need their own predicate.
#[derive(Clone, Debug)]
pub enum Voter {
    Rights(RightsVoter),
    Owner(OwnerVoter),
    Custom(Arc<dyn AccessVoter>),
}

impl Voter {
    /// Wrap a custom predicate.
    pub fn custom(voter: impl AccessVoter + 'static) -> Self {
        Voter::Custom(Arc::new(voter))
    }
}

impl AccessVoter for Voter {
    #[inline]
    fn decide(&self, ctx: &SecurityContext) -> Decision {
        match self {
            Voter::Rights(voter) => voter.decide(ctx),
            Voter::Owner(voter) => voter.decide(ctx),
            Voter::Custom(voter) => voter.decide(ctx),
        }
    }
}

impl From<RightsVoter> for Voter {
    fn from(voter: RightsVoter) -> Self {
        Voter::Rights(voter)
    }
}

impl From<OwnerVoter> for Voter {
    fn from(voter: OwnerVoter) -> Self {
        Voter::Owner(voter)
    }
}

impl fmt::Display for Voter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Voter::Rights(voter) => write!(f, "rights({}, {})", voter.right(), voter.mode()),
            Voter::Owner(_) => f.write_str("owner"),
            Voter::Custom(voter) => write!(f, "custom({:?})", voter),
        }
    }
}
