//! Registry snapshots and the pre-invocation access check.
//!
//! A snapshot is the complete, immutable routing state: components, the
//! type graph, the rights hierarchy and every compiled decision manager.
//! Building one compiles all declarations up front, so a bad declaration
//! fails the build instead of a request.

use gate_telemetry::log_access;
use shared_types::{ComponentId, Decision, DenyReason, SecurityContext};
use std::collections::HashMap;
use std::sync::Arc;
use tg_01_rights::RightsHierarchy;
use tg_02_decision::DecisionCache;
use tracing::{error, info};

use crate::config::{RegistryConfig, UndeclaredPolicy};
use crate::domain::{ComponentDescriptor, TypeDescriptor, TypeGraph};
use crate::error::RegistryError;

/// Collects types and components, then validates and compiles them into a
/// [`RegistrySnapshot`].
#[derive(Debug)]
pub struct RegistryBuilder {
    rights: Arc<RightsHierarchy>,
    config: RegistryConfig,
    types: Vec<TypeDescriptor>,
    components: Vec<ComponentDescriptor>,
}

impl RegistryBuilder {
    pub fn new(rights: Arc<RightsHierarchy>) -> Self {
        Self {
            rights,
            config: RegistryConfig::default(),
            types: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Builder-style method to set the configuration
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder-style method to add a type
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// Builder-style method to add several types
    pub fn with_types(mut self, descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.types.extend(descriptors);
        self
    }

    /// Builder-style method to add a component
    pub fn with_component(mut self, descriptor: ComponentDescriptor) -> Self {
        self.components.push(descriptor);
        self
    }

    /// Validate everything and compile all declarations.
    pub fn build(self) -> Result<RegistrySnapshot, RegistryError> {
        let types = TypeGraph::build(self.types)?;

        let decisions = DecisionCache::new();
        for descriptor in types.iter() {
            for (key, declaration) in descriptor.declarations() {
                decisions.get_or_build(&key, declaration, &self.rights)?;
            }
        }

        let mut components = HashMap::with_capacity(self.components.len());
        for descriptor in self.components {
            validate_component(&descriptor, &types)?;
            let id = descriptor.id().clone();
            if components.contains_key(&id) {
                return Err(RegistryError::DuplicateComponent(id));
            }
            components.insert(id, Arc::new(descriptor));
        }

        info!(
            components = components.len(),
            types = types.len(),
            managers = decisions.len(),
            "Registry snapshot built"
        );

        Ok(RegistrySnapshot {
            components,
            types,
            rights: self.rights,
            decisions,
            config: self.config,
        })
    }
}

fn validate_component(
    descriptor: &ComponentDescriptor,
    types: &TypeGraph,
) -> Result<(), RegistryError> {
    let component = descriptor.id();
    if !types.contains(descriptor.type_name()) {
        return Err(RegistryError::UnknownType {
            component: component.clone(),
            type_name: descriptor.type_name().clone(),
        });
    }

    for (method, verbs) in descriptor.entry_points() {
        if method.is_empty() || method.contains('/') {
            return Err(RegistryError::InvalidEntryPoint {
                component: component.clone(),
                method: method.clone(),
            });
        }
        if verbs.is_empty() {
            return Err(RegistryError::EmptyVerbs {
                component: component.clone(),
                method: method.clone(),
            });
        }
    }

    for (interface, binding) in descriptor.bindings() {
        let malformed = |reason: String| RegistryError::MalformedBinding {
            component: component.clone(),
            interface: interface.clone(),
            reason,
        };
        if !types.is_subtype_of(descriptor.type_name(), interface) {
            return Err(malformed(format!(
                "type {} does not implement it",
                descriptor.type_name()
            )));
        }
        if let Some(problem) = binding.problem() {
            return Err(malformed(problem));
        }
    }

    Ok(())
}

/// Immutable routing and authorization state.
#[derive(Debug)]
pub struct RegistrySnapshot {
    components: HashMap<ComponentId, Arc<ComponentDescriptor>>,
    types: TypeGraph,
    rights: Arc<RightsHierarchy>,
    decisions: DecisionCache,
    config: RegistryConfig,
}

impl RegistrySnapshot {
    /// Look up a component. `None` is the caller's NotFound.
    pub fn resolve(&self, id: &ComponentId) -> Option<Arc<ComponentDescriptor>> {
        self.components.get(id).cloned()
    }

    /// Registered component ids, sorted.
    pub fn component_ids(&self) -> Vec<ComponentId> {
        let mut ids: Vec<_> = self.components.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn types(&self) -> &TypeGraph {
        &self.types
    }

    pub fn rights(&self) -> &Arc<RightsHierarchy> {
        &self.rights
    }

    pub fn decisions(&self) -> &DecisionCache {
        &self.decisions
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Decide whether `ctx` may call `method` on `descriptor`.
    ///
    /// Must run, and grant, before the component is invoked.
    pub fn check_access(
        &self,
        descriptor: &ComponentDescriptor,
        method: &str,
        ctx: &SecurityContext,
    ) -> Decision {
        let decision = self.evaluate(descriptor, method, ctx);
        match decision {
            Decision::Grant => log_access!(
                debug,
                descriptor.id(),
                method,
                "Access granted",
                user = ?ctx.user_id()
            ),
            Decision::Deny(reason) => log_access!(
                warn,
                descriptor.id(),
                method,
                "Access denied",
                user = ?ctx.user_id(),
                reason = %reason
            ),
        }
        decision
    }

    fn evaluate(
        &self,
        descriptor: &ComponentDescriptor,
        method: &str,
        ctx: &SecurityContext,
    ) -> Decision {
        if let Some(asserted) = ctx.asserted_identity() {
            match ctx.user_id() {
                None => return Decision::Deny(DenyReason::NotAuthenticated),
                Some(user) if user != asserted => {
                    return Decision::Deny(DenyReason::IdentityMismatch)
                }
                Some(_) => {}
            }
        }

        let Some((key, declaration)) = self.types.nearest_declaration(descriptor.type_name(), method)
        else {
            return self.config.undeclared_policy.decide(ctx);
        };

        let manager = match self.decisions.get(&key) {
            Some(manager) => manager,
            None => match self.decisions.get_or_build(&key, declaration, &self.rights) {
                Ok(manager) => manager,
                Err(e) => {
                    error!(key = %key, error = %e, "Declaration failed to compile at request time");
                    return Decision::Deny(DenyReason::InsufficientRights);
                }
            },
        };
        manager.decide(ctx)
    }

    /// Check an arbitrary component id and method; unknown components are
    /// always denied, whatever the undeclared policy.
    pub fn check_access_by_id(
        &self,
        id: &ComponentId,
        method: &str,
        ctx: &SecurityContext,
    ) -> Decision {
        match self.resolve(id) {
            Some(descriptor) => self.check_access(&descriptor, method, ctx),
            None => UndeclaredPolicy::Deny.decide(ctx),
        }
    }
}
