//! The live registry: one current snapshot, atomically replaceable.
//!
//! Readers take a cheap `Arc` clone of the current snapshot and keep using
//! it for the whole request, so a concurrent [`Registry::replace`] never
//! shows them a half-updated mapping.

use parking_lot::RwLock;
use shared_types::{ComponentId, Decision, SecurityContext};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::domain::ComponentDescriptor;
use crate::snapshot::RegistrySnapshot;

#[derive(Debug)]
pub struct Registry {
    current: RwLock<Arc<RegistrySnapshot>>,
    generation: AtomicU64,
}

impl Registry {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.read().clone()
    }

    /// Install `snapshot` for all subsequent requests and return the one it
    /// replaced. Requests already holding the old snapshot finish on it.
    pub fn replace(&self, snapshot: RegistrySnapshot) -> Arc<RegistrySnapshot> {
        let incoming = Arc::new(snapshot);
        let components = incoming.len();
        let (previous, generation) = {
            let mut current = self.current.write();
            let previous = std::mem::replace(&mut *current, incoming);
            (previous, self.generation.fetch_add(1, Ordering::AcqRel) + 1)
        };
        info!(generation, components, "Registry snapshot replaced");
        previous
    }

    /// Number of completed replacements.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn resolve(&self, id: &ComponentId) -> Option<Arc<ComponentDescriptor>> {
        self.snapshot().resolve(id)
    }

    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.snapshot().component_ids()
    }

    /// Resolve `id` and check access on one pinned snapshot.
    ///
    /// A descriptor obtained earlier may belong to a replaced snapshot; to
    /// check one, call [`RegistrySnapshot::check_access`] on the snapshot it
    /// was resolved from.
    pub fn check_access(&self, id: &ComponentId, method: &str, ctx: &SecurityContext) -> Decision {
        self.snapshot().check_access_by_id(id, method, ctx)
    }
}
