//! Component descriptors: everything the dispatcher needs to route a call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{ComponentId, HttpVerb, TypeName};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::ports::{Component, ComponentFactory, InstanceProvider};

/// Instance lifetime of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Singleton,
    PerRequest,
}

/// Metadata a component declares for one interface it implements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binding {
    /// Route the interface is published under, starting with `/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// JSON schema of the interface's configuration; must be an object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_config_schema(mut self, schema: Value) -> Self {
        self.config_schema = Some(schema);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Structural problems with this binding, if any.
    pub(crate) fn problem(&self) -> Option<String> {
        if let Some(route) = &self.route {
            if !route.starts_with('/') {
                return Some(format!("route {:?} must start with '/'", route));
            }
        }
        match &self.config_schema {
            Some(schema) if !schema.is_object() => {
                Some("config schema must be a JSON object".to_string())
            }
            _ => None,
        }
    }
}

/// A registered component.
///
/// Immutable once built into a snapshot; replaced only by swapping the
/// whole snapshot.
#[derive(Clone, Debug)]
pub struct ComponentDescriptor {
    id: ComponentId,
    type_name: TypeName,
    bindings: BTreeMap<TypeName, Binding>,
    entry_points: BTreeMap<String, BTreeSet<HttpVerb>>,
    provider: InstanceProvider,
}

impl ComponentDescriptor {
    /// A component with one shared instance.
    pub fn singleton(
        id: impl Into<ComponentId>,
        type_name: impl Into<TypeName>,
        instance: Arc<dyn Component>,
    ) -> Self {
        Self::with_provider(id, type_name, InstanceProvider::Singleton(instance))
    }

    /// A component instantiated per request.
    pub fn per_request(
        id: impl Into<ComponentId>,
        type_name: impl Into<TypeName>,
        factory: impl ComponentFactory + 'static,
    ) -> Self {
        Self::with_provider(id, type_name, InstanceProvider::PerRequest(Arc::new(factory)))
    }

    pub fn with_provider(
        id: impl Into<ComponentId>,
        type_name: impl Into<TypeName>,
        provider: InstanceProvider,
    ) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            bindings: BTreeMap::new(),
            entry_points: BTreeMap::new(),
            provider,
        }
    }

    /// Builder-style method to expose a method under the given verbs
    pub fn with_entry_point(
        mut self,
        method: impl Into<String>,
        verbs: impl IntoIterator<Item = HttpVerb>,
    ) -> Self {
        self.entry_points
            .entry(method.into())
            .or_default()
            .extend(verbs);
        self
    }

    /// Builder-style method to attach interface metadata
    pub fn with_binding(mut self, interface: impl Into<TypeName>, binding: Binding) -> Self {
        self.bindings.insert(interface.into(), binding);
        self
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn bindings(&self) -> &BTreeMap<TypeName, Binding> {
        &self.bindings
    }

    pub fn binding(&self, interface: &TypeName) -> Option<&Binding> {
        self.bindings.get(interface)
    }

    pub fn entry_points(&self) -> &BTreeMap<String, BTreeSet<HttpVerb>> {
        &self.entry_points
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.provider {
            InstanceProvider::Singleton(_) => Lifecycle::Singleton,
            InstanceProvider::PerRequest(_) => Lifecycle::PerRequest,
        }
    }

    /// Check if `method` exists and accepts `verb`.
    pub fn accepts(&self, method: &str, verb: HttpVerb) -> bool {
        self.entry_points
            .get(method)
            .is_some_and(|verbs| verbs.contains(&verb))
    }

    /// The instance to serve one request with.
    pub fn instance(&self) -> Arc<dyn Component> {
        self.provider.instance()
    }
}
