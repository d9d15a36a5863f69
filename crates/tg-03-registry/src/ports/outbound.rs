//! Outbound (Driven) ports: the handlers the registry hands calls to.

use async_trait::async_trait;
use serde_json::Value;
use shared_types::{HttpVerb, Identity};
use std::fmt;
use std::sync::Arc;

use crate::error::HandlerError;

/// One call into a component, after access has been granted.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    /// Entry point name
    pub method: String,
    /// Path remainder after `component/method/`, possibly empty
    pub sub_path: String,
    pub verb: HttpVerb,
    pub params: Value,
    /// The authenticated caller
    pub caller: Identity,
}

/// A request handler reachable through the dispatcher.
///
/// Implementations own their business semantics; the registry only
/// guarantees that `invoke` is never reached for a denied call.
#[async_trait]
pub trait Component: Send + Sync {
    async fn invoke(&self, call: Invocation) -> Result<Value, HandlerError>;
}

/// Produces a fresh component instance for every request.
pub trait ComponentFactory: Send + Sync {
    fn create(&self) -> Arc<dyn Component>;
}

impl<F> ComponentFactory for F
where
    F: Fn() -> Arc<dyn Component> + Send + Sync,
{
    fn create(&self) -> Arc<dyn Component> {
        self()
    }
}

/// Where a descriptor's instances come from.
#[derive(Clone)]
pub enum InstanceProvider {
    /// One shared instance for every request
    Singleton(Arc<dyn Component>),
    /// A new instance per request
    PerRequest(Arc<dyn ComponentFactory>),
}

impl InstanceProvider {
    /// The instance to serve one request with.
    pub fn instance(&self) -> Arc<dyn Component> {
        match self {
            InstanceProvider::Singleton(component) => Arc::clone(component),
            InstanceProvider::PerRequest(factory) => factory.create(),
        }
    }
}

impl fmt::Debug for InstanceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceProvider::Singleton(_) => f.write_str("Singleton(..)"),
            InstanceProvider::PerRequest(_) => f.write_str("PerRequest(..)"),
        }
    }
}

/// Returns a fixed JSON value for every call. Useful as a stand-in handler.
#[derive(Clone, Debug, Default)]
pub struct StaticComponent {
    value: Value,
}

impl StaticComponent {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl Component for StaticComponent {
    async fn invoke(&self, _call: Invocation) -> Result<Value, HandlerError> {
        Ok(self.value.clone())
    }
}
