//! Decision manager cache.
//!
//! Keyed by [`DeclarationKey`]. Lookups on different keys never contend;
//! the first writer for a key builds the manager while holding that key's
//! shard entry, so concurrent first requests observe one and the same
//! `Arc<DecisionManager>`.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tg_01_rights::RightsHierarchy;
use tracing::debug;

use crate::domain::{DeclarationKey, DecisionManager, SecurityDeclaration};
use crate::error::DecisionError;

/// Point-in-time cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub builds: u64,
}

/// Shared, concurrent map from declaration key to compiled manager.
#[derive(Debug, Default)]
pub struct DecisionCache {
    managers: DashMap<DeclarationKey, Arc<DecisionManager>>,
    hits: AtomicU64,
    builds: AtomicU64,
}

impl DecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the cached manager for `key`, or compile `declaration` and
    /// insert it if absent.
    ///
    /// A compile failure leaves the cache untouched and is reported as
    /// [`DecisionError::InvalidDeclaration`].
    pub fn get_or_build(
        &self,
        key: &DeclarationKey,
        declaration: &SecurityDeclaration,
        rights: &RightsHierarchy,
    ) -> Result<Arc<DecisionManager>, DecisionError> {
        if let Some(manager) = self.managers.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(manager.value()));
        }

        match self.managers.entry(key.clone()) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let manager = Arc::new(compile(key, declaration, rights)?);
                self.builds.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, manager = %manager, "Compiled decision manager");
                Ok(Arc::clone(entry.insert(manager).value()))
            }
        }
    }

    /// Lookup without building.
    pub fn get(&self, key: &DeclarationKey) -> Option<Arc<DecisionManager>> {
        self.managers.get(key).map(|m| Arc::clone(m.value()))
    }

    pub fn contains(&self, key: &DeclarationKey) -> bool {
        self.managers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.managers.len(),
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }
}

/// Compile one declaration, attributing failures to `key`.
pub fn compile(
    key: &DeclarationKey,
    declaration: &SecurityDeclaration,
    rights: &RightsHierarchy,
) -> Result<DecisionManager, DecisionError> {
    DecisionManager::from_declaration(declaration, rights).map_err(|e| match e {
        DecisionError::Rights(source) => DecisionError::InvalidDeclaration {
            key: key.clone(),
            source,
        },
        other => other,
    })
}
