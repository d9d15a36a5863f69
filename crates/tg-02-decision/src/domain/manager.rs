//! Decision managers: voters composed into one immutable predicate.
//!
//! ## Factory
//!
//! Given a [`SecurityDeclaration`]:
//! 1. one `RightsVoter` per required right, with the declared match mode
//! 2. an `OwnerVoter` appended when `by_owner` is set
//! 3. no voters at all → `AllAllowed`
//! 4. otherwise `And` → `Conjunction`, `Or` → `Disjunction`
//! 5. unless `allow_anonymous`, the result is wrapped in `AnonymousRejecting`
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: `Conjunction` and `Disjunction` evaluate voters in
//!   declaration order and stop at the first deciding vote.
//! - **INVARIANT-2**: the factory never yields an empty `Disjunction`.
//! - **INVARIANT-3**: `AnonymousRejecting` denies anonymous callers without
//!   consulting its inner manager.

use shared_types::{Decision, DenyReason, SecurityContext};
use std::fmt;
use tg_01_rights::RightsHierarchy;

use crate::domain::declaration::{Combinator, SecurityDeclaration};
use crate::domain::voter::{AccessVoter, OwnerVoter, RightsVoter, Voter};
use crate::error::DecisionError;

/// Pure, stateless, immutable access predicate.
#[derive(Clone, Debug)]
pub enum DecisionManager {
    /// No requirements; always grants.
    AllAllowed,
    /// Grants only if every voter grants.
    Conjunction(Vec<Voter>),
    /// Grants if any voter grants.
    Disjunction(Vec<Voter>),
    /// Denies anonymous callers, otherwise defers to the inner manager.
    AnonymousRejecting(Box<DecisionManager>),
}

impl DecisionManager {
    /// Build the manager for a declaration.
    ///
    /// Fails if a required right is not registered in `rights`.
    pub fn from_declaration(
        declaration: &SecurityDeclaration,
        rights: &RightsHierarchy,
    ) -> Result<Self, DecisionError> {
        let mut voters = Vec::with_capacity(declaration.required.len() + 1);
        for right in &declaration.required {
            voters.push(Voter::Rights(RightsVoter::new(
                right,
                declaration.match_mode,
                rights,
            )?));
        }
        if declaration.by_owner {
            voters.push(Voter::Owner(OwnerVoter));
        }

        let manager = if voters.is_empty() {
            DecisionManager::AllAllowed
        } else {
            match declaration.combinator {
                Combinator::And => DecisionManager::Conjunction(voters),
                Combinator::Or => DecisionManager::Disjunction(voters),
            }
        };

        Ok(if declaration.allow_anonymous {
            manager
        } else {
            DecisionManager::AnonymousRejecting(Box::new(manager))
        })
    }

    /// Wrap `inner` so anonymous callers are always denied.
    pub fn rejecting_anonymous(inner: DecisionManager) -> Self {
        DecisionManager::AnonymousRejecting(Box::new(inner))
    }

    /// Evaluate against one request's context.
    pub fn decide(&self, ctx: &SecurityContext) -> Decision {
        match self {
            DecisionManager::AllAllowed => Decision::Grant,
            DecisionManager::Conjunction(voters) => voters
                .iter()
                .map(|voter| voter.decide(ctx))
                .find(Decision::is_denied)
                .unwrap_or(Decision::Grant),
            DecisionManager::Disjunction(voters) => {
                let mut last = Decision::Deny(DenyReason::InsufficientRights);
                for voter in voters {
                    match voter.decide(ctx) {
                        Decision::Grant => return Decision::Grant,
                        denied => last = denied,
                    }
                }
                last
            }
            DecisionManager::AnonymousRejecting(inner) => {
                if ctx.is_anonymous() {
                    Decision::Deny(DenyReason::NotAuthenticated)
                } else {
                    inner.decide(ctx)
                }
            }
        }
    }

    /// Check if this manager admits anonymous callers at all.
    pub fn admits_anonymous(&self) -> bool {
        !matches!(self, DecisionManager::AnonymousRejecting(_))
    }
}

impl AccessVoter for DecisionManager {
    fn decide(&self, ctx: &SecurityContext) -> Decision {
        DecisionManager::decide(self, ctx)
    }
}

fn write_voters(f: &mut fmt::Formatter<'_>, name: &str, voters: &[Voter]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, voter) in voters.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", voter)?;
    }
    f.write_str(")")
}

impl fmt::Display for DecisionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionManager::AllAllowed => f.write_str("all_allowed"),
            DecisionManager::Conjunction(voters) => write_voters(f, "and", voters),
            DecisionManager::Disjunction(voters) => write_voters(f, "or", voters),
            DecisionManager::AnonymousRejecting(inner) => {
                write!(f, "anonymous_rejecting({})", inner)
            }
        }
    }
}
