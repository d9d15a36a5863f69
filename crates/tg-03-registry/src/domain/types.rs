//! Component type graph and supertype traversal.
//!
//! Every component has a type; a type has at most one superclass and any
//! number of interfaces. Security declarations hang off types (type-level)
//! or off individual methods of a type (method-level) and are inherited
//! through this graph.
//!
//! ## Traversal order
//!
//! Breadth-first from the type itself. Within a level the superclass comes
//! before the interfaces, interfaces in declaration order. A type reachable
//! along several paths (diamond) is yielded once, at its first position.
//! For `A extends B implements C, D` and `B extends E implements F` the
//! order is `A, B, C, D, E, F`.

use serde::{Deserialize, Serialize};
use shared_types::TypeName;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tg_02_decision::{DeclarationKey, SecurityDeclaration};

use crate::error::RegistryError;

/// A node in the type graph with its own declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: TypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<TypeName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeName>,
    /// Type-level declaration, applies to every method without its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityDeclaration>,
    /// Method-level declarations, by method name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub method_security: BTreeMap<String, SecurityDeclaration>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            security: None,
            method_security: BTreeMap::new(),
        }
    }

    /// Builder-style method to set the superclass
    pub fn extends(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Builder-style method to add an interface
    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Builder-style method to set the type-level declaration
    pub fn secured(mut self, declaration: SecurityDeclaration) -> Self {
        self.security = Some(declaration);
        self
    }

    /// Builder-style method to declare security for one method
    pub fn secure_method(
        mut self,
        method: impl Into<String>,
        declaration: SecurityDeclaration,
    ) -> Self {
        self.method_security.insert(method.into(), declaration);
        self
    }

    /// Direct supertypes: superclass first, then interfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &TypeName> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    /// Every declaration on this type with its cache key.
    pub fn declarations(&self) -> impl Iterator<Item = (DeclarationKey, &SecurityDeclaration)> {
        let type_level = self
            .security
            .iter()
            .map(|decl| (DeclarationKey::for_type(self.name.clone()), decl));
        let method_level = self.method_security.iter().map(|(method, decl)| {
            (
                DeclarationKey::for_method(self.name.clone(), method.clone()),
                decl,
            )
        });
        type_level.chain(method_level)
    }
}

/// Validated, acyclic type graph.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    types: HashMap<TypeName, TypeDescriptor>,
}

impl TypeGraph {
    /// Build the graph, rejecting duplicates, dangling supertype references
    /// and inheritance cycles.
    pub fn build(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self, RegistryError> {
        let mut types = HashMap::new();
        for descriptor in descriptors {
            if types.contains_key(&descriptor.name) {
                return Err(RegistryError::DuplicateType(descriptor.name));
            }
            types.insert(descriptor.name.clone(), descriptor);
        }

        for descriptor in types.values() {
            for supertype in descriptor.direct_supertypes() {
                if !types.contains_key(supertype) {
                    return Err(RegistryError::UnknownSupertype {
                        type_name: descriptor.name.clone(),
                        supertype: supertype.clone(),
                    });
                }
            }
        }

        let graph = Self { types };
        graph.check_acyclic()?;
        Ok(graph)
    }

    /// Kahn's algorithm over subtype → supertype edges; whatever cannot be
    /// peeled off sits on a cycle.
    fn check_acyclic(&self) -> Result<(), RegistryError> {
        let mut subtypes: HashMap<&TypeName, usize> =
            self.types.keys().map(|name| (name, 0)).collect();
        for descriptor in self.types.values() {
            for supertype in descriptor.direct_supertypes() {
                if let Some(count) = subtypes.get_mut(supertype) {
                    *count += 1;
                }
            }
        }

        let mut ready: Vec<&TypeName> = subtypes
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut peeled = 0;

        while let Some(name) = ready.pop() {
            peeled += 1;
            let Some(descriptor) = self.types.get(name) else {
                continue;
            };
            for supertype in descriptor.direct_supertypes() {
                if let Some(count) = subtypes.get_mut(supertype) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(supertype);
                    }
                }
            }
        }

        if peeled == self.types.len() {
            return Ok(());
        }
        let mut cyclic: Vec<&TypeName> = subtypes
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, _)| name)
            .collect();
        cyclic.sort();
        match cyclic.first() {
            Some(name) => Err(RegistryError::InheritanceCycle((*name).clone())),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Lazy breadth-first traversal of `name` and all its supertypes.
    ///
    /// Every call starts a fresh traversal. An unregistered name yields
    /// nothing.
    pub fn supertypes(&self, name: &TypeName) -> Supertypes<'_> {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        if let Some(start) = self.types.get(name) {
            visited.insert(&start.name);
            queue.push_back(start);
        }
        Supertypes {
            graph: self,
            queue,
            visited,
        }
    }

    /// Check if `name` is `ancestor` or inherits from it.
    pub fn is_subtype_of(&self, name: &TypeName, ancestor: &TypeName) -> bool {
        self.supertypes(name).any(|t| &t.name == ancestor)
    }

    /// The declaration governing `method` on `name`.
    ///
    /// A method-level declaration anywhere in the traversal beats every
    /// type-level one; among each kind the earliest type wins.
    pub fn nearest_declaration(
        &self,
        name: &TypeName,
        method: &str,
    ) -> Option<(DeclarationKey, &SecurityDeclaration)> {
        self.supertypes(name)
            .find_map(|t| {
                t.method_security
                    .get(method)
                    .map(|decl| (DeclarationKey::for_method(t.name.clone(), method), decl))
            })
            .or_else(|| {
                self.supertypes(name).find_map(|t| {
                    t.security
                        .as_ref()
                        .map(|decl| (DeclarationKey::for_type(t.name.clone()), decl))
                })
            })
    }
}

/// Iterator returned by [`TypeGraph::supertypes`].
///
/// Types are marked visited when enqueued, so each is yielded once even when
/// reachable along several paths.
#[derive(Debug)]
pub struct Supertypes<'a> {
    graph: &'a TypeGraph,
    queue: VecDeque<&'a TypeDescriptor>,
    visited: HashSet<&'a TypeName>,
}

impl<'a> Iterator for Supertypes<'a> {
    type Item = &'a TypeDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        for supertype in current.direct_supertypes() {
            if let Some(descriptor) = self.graph.types.get(supertype) {
                if self.visited.insert(&descriptor.name) {
                    self.queue.push_back(descriptor);
                }
            }
        }
        Some(current)
    }
}
