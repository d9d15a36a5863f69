//! The RPC dispatcher.
//!
//! Per request: `Received → PathParsed → Resolved → AccessChecked →
//! Invoked → Responded`. Any step may end the request early with a terminal
//! [`DispatchOutcome`]; the handler is reached only after a Grant.

use gate_telemetry::{component_span, log_request};
use shared_types::{ComponentId, Decision, SecurityContext};
use std::sync::Arc;
use std::time::Instant;
use tg_03_registry::{Invocation, Registry, RegistrySnapshot};
use tokio::time::timeout;
use tracing::{debug, error, Instrument};

use crate::config::DispatchConfig;
use crate::domain::{parse_path, DispatchOutcome, RequestId, RpcRequest, RpcTarget};
use crate::error::ConfigError;
use crate::metrics::DispatchMetrics;

pub struct Dispatcher {
    registry: Arc<Registry>,
    config: DispatchConfig,
    metrics: Arc<DispatchMetrics>,
}

impl Dispatcher {
    /// Dispatcher with the default configuration.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            config: DispatchConfig::default(),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    pub fn with_config(registry: Arc<Registry>, config: DispatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(registry)
        })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Handle one request end to end.
    pub async fn dispatch(&self, request: RpcRequest, ctx: &SecurityContext) -> DispatchOutcome {
        let request_id = RequestId::new();
        let started = Instant::now();
        let span = component_span!(
            "dispatch",
            request_id = %request_id,
            verb = %request.verb,
            path = %request.path
        );

        let outcome = self.run(request_id, request, ctx).instrument(span).await;

        let latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.metrics.record_outcome(&outcome, latency_us);
        log_request!(
            debug,
            request_id,
            "Request finished",
            outcome = outcome.label(),
            latency_us
        );
        outcome
    }

    async fn run(
        &self,
        request_id: RequestId,
        request: RpcRequest,
        ctx: &SecurityContext,
    ) -> DispatchOutcome {
        // Pin one snapshot for the whole request.
        let snapshot = self.registry.snapshot();

        let Some(target) = self.resolve_in(&snapshot, &request) else {
            return DispatchOutcome::NotFound;
        };

        if let Decision::Deny(reason) =
            snapshot.check_access(&target.descriptor, &target.method, ctx)
        {
            return DispatchOutcome::Forbidden { reason };
        }

        self.invoke(request_id, target, request, ctx).await
    }

    /// Resolve a request against the current snapshot without checking
    /// access. `None` covers every way resolution can fail.
    pub fn resolve(&self, request: &RpcRequest) -> Option<RpcTarget> {
        self.resolve_in(&self.registry.snapshot(), request)
    }

    fn resolve_in(&self, snapshot: &RegistrySnapshot, request: &RpcRequest) -> Option<RpcTarget> {
        let path = match parse_path(&request.path, self.config.max_path_len) {
            Ok(path) => path,
            Err(e) => {
                debug!(path = %request.path, error = %e, "Unroutable path");
                return None;
            }
        };

        let component = ComponentId::new(path.component);
        let descriptor = snapshot.resolve(&component)?;
        if !descriptor.accepts(path.function, request.verb) {
            return None;
        }

        Some(RpcTarget {
            component,
            descriptor,
            method: path.function.to_string(),
            sub_path: path.sub_path.to_string(),
        })
    }

    async fn invoke(
        &self,
        request_id: RequestId,
        target: RpcTarget,
        request: RpcRequest,
        ctx: &SecurityContext,
    ) -> DispatchOutcome {
        let instance = target.descriptor.instance();
        let call = Invocation {
            method: target.method.clone(),
            sub_path: target.sub_path,
            verb: request.verb,
            params: request.params,
            caller: ctx.identity(),
        };

        self.metrics.record_invocation();
        let result = match self.config.invocation_timeout() {
            Some(limit) => match timeout(limit, instance.invoke(call)).await {
                Ok(result) => result,
                Err(_) => {
                    self.metrics.record_timeout();
                    error!(
                        request_id = %request_id,
                        component = %target.component,
                        method = %target.method,
                        timeout_ms = self.config.invocation_timeout_ms,
                        "Handler timed out"
                    );
                    return self.generic_error();
                }
            },
            None => instance.invoke(call).await,
        };

        match result {
            Ok(value) => DispatchOutcome::Ok { value },
            Err(e) => {
                error!(
                    request_id = %request_id,
                    component = %target.component,
                    method = %target.method,
                    error = %e,
                    details = ?e,
                    "Handler failed"
                );
                self.generic_error()
            }
        }
    }

    fn generic_error(&self) -> DispatchOutcome {
        DispatchOutcome::Error {
            message: self.config.generic_error_message.clone(),
        }
    }
}
