//! Standalone access checks against a rights hierarchy.
//!
//! `AccessChecker` is the reusable primitive for call sites outside the
//! registry (e.g. a handler guarding a sub-resource): it compiles ad hoc
//! declarations lazily through the shared [`DecisionCache`].

use shared_types::{Decision, SecurityContext};
use std::sync::Arc;
use tg_01_rights::RightsHierarchy;
use tracing::{debug, warn};

use crate::cache::DecisionCache;
use crate::domain::{DeclarationKey, SecurityDeclaration};
use crate::error::DecisionError;

#[derive(Clone, Debug)]
pub struct AccessChecker {
    rights: Arc<RightsHierarchy>,
    cache: Arc<DecisionCache>,
}

impl AccessChecker {
    pub fn new(rights: Arc<RightsHierarchy>) -> Self {
        Self::with_cache(rights, Arc::new(DecisionCache::new()))
    }

    pub fn with_cache(rights: Arc<RightsHierarchy>, cache: Arc<DecisionCache>) -> Self {
        Self { rights, cache }
    }

    pub fn rights(&self) -> &Arc<RightsHierarchy> {
        &self.rights
    }

    pub fn cache(&self) -> &Arc<DecisionCache> {
        &self.cache
    }

    /// Evaluate `declaration` (cached under `key`) against `ctx`.
    ///
    /// Errors only when the declaration itself is invalid; the decision is
    /// otherwise always Grant or Deny.
    pub fn check_declaration(
        &self,
        key: &DeclarationKey,
        declaration: &SecurityDeclaration,
        ctx: &SecurityContext,
    ) -> Result<Decision, DecisionError> {
        let manager = self.cache.get_or_build(key, declaration, &self.rights)?;
        let decision = manager.decide(ctx);
        match &decision {
            Decision::Grant => debug!(key = %key, user = ?ctx.user_id(), "Access granted"),
            Decision::Deny(reason) => warn!(
                key = %key,
                user = ?ctx.user_id(),
                reason = %reason.message(),
                "Access denied"
            ),
        }
        Ok(decision)
    }
}
