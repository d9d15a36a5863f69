//! Immutable rights tree with precomputed descendant closures.
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: the parent relation is acyclic; every node reaches a root.
//! - **INVARIANT-2**: `descendants(r)` is exactly the transitive closure of
//!   `children(r)` and never contains `r` itself.
//! - **INVARIANT-3**: the tree never changes after `build` returns.

use crate::domain::catalogue::RightsCatalogue;
use crate::domain::matching::{MatchMode, RightMatcher};
use crate::error::RightsError;
use shared_types::RightId;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Shared, immutable set of right ids.
pub type RightSet = HashSet<RightId>;

/// One node in the rights tree.
#[derive(Clone, Debug)]
pub struct RightNode {
    id: RightId,
    parent: Option<RightId>,
    children: Vec<RightId>,
    depth: usize,
    descendants: Arc<RightSet>,
}

impl RightNode {
    pub fn id(&self) -> &RightId {
        &self.id
    }

    pub fn parent(&self) -> Option<&RightId> {
        self.parent.as_ref()
    }

    /// Direct children, in catalogue order.
    pub fn children(&self) -> &[RightId] {
        &self.children
    }

    /// Distance from the root (roots have depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Transitive closure of the children.
    pub fn descendants(&self) -> &Arc<RightSet> {
        &self.descendants
    }
}

/// The rights tree.
///
/// Built once from a [`RightsCatalogue`] and shared read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct RightsHierarchy {
    nodes: HashMap<RightId, RightNode>,
    roots: Vec<RightId>,
    order: Vec<RightId>,
}

impl RightsHierarchy {
    /// Validate `catalogue` and build the tree.
    ///
    /// Rejects empty ids, duplicates, unknown parents and cycles.
    pub fn build(catalogue: &RightsCatalogue) -> Result<Self, RightsError> {
        let entries = catalogue.entries();

        let mut declared: HashMap<RightId, Option<RightId>> = HashMap::with_capacity(entries.len());
        for entry in entries {
            if entry.id.is_empty() {
                return Err(RightsError::EmptyId);
            }
            if declared
                .insert(entry.id.clone(), entry.parent.clone())
                .is_some()
            {
                return Err(RightsError::DuplicateRight(entry.id.clone()));
            }
        }

        let mut children: HashMap<RightId, Vec<RightId>> = HashMap::with_capacity(entries.len());
        let mut roots = Vec::new();
        for entry in entries {
            match &entry.parent {
                None => roots.push(entry.id.clone()),
                Some(parent) => {
                    if !declared.contains_key(parent) {
                        return Err(RightsError::UnknownParent {
                            right: entry.id.clone(),
                            parent: parent.clone(),
                        });
                    }
                    children
                        .entry(parent.clone())
                        .or_default()
                        .push(entry.id.clone());
                }
            }
        }

        // Breadth-first from the roots; anything not reached sits on a cycle.
        let mut depth: HashMap<RightId, usize> = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());
        let mut queue: VecDeque<RightId> = roots.iter().cloned().collect();
        for root in &roots {
            depth.insert(root.clone(), 0);
        }
        while let Some(id) = queue.pop_front() {
            let level = depth.get(&id).copied().unwrap_or_default();
            for child in children.get(&id).map(Vec::as_slice).unwrap_or_default() {
                depth.insert(child.clone(), level + 1);
                queue.push_back(child.clone());
            }
            order.push(id);
        }

        if let Some(entry) = entries.iter().find(|e| !depth.contains_key(&e.id)) {
            return Err(RightsError::Cycle(entry.id.clone()));
        }

        // Deepest nodes first so every child's closure exists before its parent's.
        let mut closures: HashMap<RightId, Arc<RightSet>> = HashMap::with_capacity(order.len());
        for id in order.iter().rev() {
            let mut closure = RightSet::new();
            for child in children.get(id).map(Vec::as_slice).unwrap_or_default() {
                closure.insert(child.clone());
                if let Some(grand) = closures.get(child) {
                    closure.extend(grand.iter().cloned());
                }
            }
            closures.insert(id.clone(), Arc::new(closure));
        }

        let mut nodes = HashMap::with_capacity(order.len());
        for entry in entries {
            let node = RightNode {
                id: entry.id.clone(),
                parent: entry.parent.clone(),
                children: children.remove(&entry.id).unwrap_or_default(),
                depth: depth.get(&entry.id).copied().unwrap_or_default(),
                descendants: closures.remove(&entry.id).unwrap_or_default(),
            };
            nodes.insert(entry.id.clone(), node);
        }

        debug!(
            rights = nodes.len(),
            roots = roots.len(),
            "Rights hierarchy built"
        );

        Ok(Self {
            nodes,
            roots,
            order,
        })
    }

    /// Number of registered rights.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no right is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if a right is registered.
    pub fn contains(&self, id: &RightId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node.
    pub fn node(&self, id: &RightId) -> Result<&RightNode, RightsError> {
        self.nodes
            .get(id)
            .ok_or_else(|| RightsError::UnknownRight(id.clone()))
    }

    /// Roots in catalogue order.
    pub fn roots(&self) -> &[RightId] {
        &self.roots
    }

    /// All rights, breadth-first from the roots.
    pub fn iter(&self) -> impl Iterator<Item = &RightNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn parent(&self, id: &RightId) -> Result<Option<&RightId>, RightsError> {
        Ok(self.node(id)?.parent())
    }

    pub fn children(&self, id: &RightId) -> Result<&[RightId], RightsError> {
        Ok(self.node(id)?.children())
    }

    pub fn descendants(&self, id: &RightId) -> Result<&Arc<RightSet>, RightsError> {
        Ok(self.node(id)?.descendants())
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: &RightId) -> Result<Vec<RightId>, RightsError> {
        let mut chain = Vec::new();
        let mut cursor = self.node(id)?.parent.clone();
        while let Some(parent) = cursor {
            cursor = self.nodes.get(&parent).and_then(|n| n.parent.clone());
            chain.push(parent);
        }
        Ok(chain)
    }

    /// True if `candidate` lies strictly below `ancestor`.
    pub fn is_descendant(&self, candidate: &RightId, ancestor: &RightId) -> bool {
        self.nodes
            .get(ancestor)
            .is_some_and(|node| node.descendants.contains(candidate))
    }

    /// Resolve `required` into a matcher that can be evaluated without any
    /// further lookups.
    ///
    /// An unregistered right is a configuration error, so this is meant to be
    /// called when declarations are compiled, not per request.
    pub fn matcher(&self, required: &RightId, mode: MatchMode) -> Result<RightMatcher, RightsError> {
        let node = self.node(required)?;
        Ok(RightMatcher::new(
            node.id.clone(),
            mode,
            Arc::clone(&node.descendants),
        ))
    }

    /// One-shot form of [`RightMatcher::matches`].
    pub fn matches(
        &self,
        required: &RightId,
        mode: MatchMode,
        held: &RightSet,
    ) -> Result<bool, RightsError> {
        Ok(self.matcher(required, mode)?.matches(held))
    }
}
