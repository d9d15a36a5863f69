//! # Hot Reload and Concurrency
//!
//! Snapshot replacement while requests are in flight:
//!
//! - a request finishes on the snapshot it started with
//! - requests after `replace` see only the new mapping
//! - many concurrent requests share one compiled manager per declaration

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::future::join_all;
    use serde_json::Value;
    use shared_types::{HttpVerb, SecurityContext};
    use std::sync::Arc;
    use std::time::Duration;
    use tg_02_decision::{DeclarationKey, MatchMode, SecurityDeclaration};
    use tg_03_registry::{
        Component, ComponentDescriptor, HandlerError, Invocation, Registry, RegistryBuilder,
        TypeDescriptor,
    };
    use tg_04_dispatch::{DispatchConfig, DispatchOutcome, Dispatcher, RpcRequest};
    use tokio::sync::Notify;

    use crate::fixtures::{platform, rights, snapshot};

    /// Blocks until released, then answers.
    struct Gate {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl Component for Gate {
        async fn invoke(&self, _call: Invocation) -> Result<Value, HandlerError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(Value::from("finished on old snapshot"))
        }
    }

    #[tokio::test]
    async fn test_in_flight_request_keeps_its_snapshot() {
        gate_telemetry::init_test_logging();
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());

        let old = RegistryBuilder::new(rights())
            .with_type(TypeDescriptor::new("Batch").secured(SecurityDeclaration::new()))
            .with_component(
                ComponentDescriptor::singleton(
                    "batch",
                    "Batch",
                    Arc::new(Gate {
                        entered: Arc::clone(&entered),
                        release: Arc::clone(&release),
                    }),
                )
                .with_entry_point("run", [HttpVerb::Post]),
            )
            .build()
            .unwrap();
        let registry = Arc::new(Registry::new(old));
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));

        let in_flight = {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let ctx = SecurityContext::user("ops");
                dispatcher.dispatch(RpcRequest::post("/batch/run"), &ctx).await
            })
        };
        entered.notified().await;

        // Swap in a registry without the batch component
        let empty = RegistryBuilder::new(rights()).build().unwrap();
        registry.replace(empty);
        assert_eq!(registry.generation(), 1);

        let late = dispatcher
            .dispatch(RpcRequest::post("/batch/run"), &SecurityContext::user("ops"))
            .await;
        assert_eq!(late, DispatchOutcome::NotFound);

        release.notify_one();
        let outcome = in_flight.await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Ok {
                value: Value::from("finished on old snapshot")
            }
        );
    }

    #[tokio::test]
    async fn test_replace_changes_decisions_for_new_requests() {
        let platform = platform();
        let ta = SecurityContext::user("ta").with_right("CourseAdmin.Grades");

        let before = platform
            .dispatcher
            .dispatch(RpcRequest::get("/grades/list"), &ta)
            .await;
        assert!(before.is_ok());

        // Tighten GradeBook to exact CourseAdmin
        let tightened = snapshot(
            MatchMode::Exact,
            &platform.recorder,
            &platform.profiles_created,
        );
        platform.registry.replace(tightened);

        let after = platform
            .dispatcher
            .dispatch(RpcRequest::get("/grades/list"), &ta)
            .await;
        assert_eq!(after.reason_text(), Some("Insufficient rights"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_during_swaps() {
        let platform = platform();
        let dispatcher = Arc::clone(&platform.dispatcher);

        let requests = (0..64).map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            async move {
                let ctx = SecurityContext::user(format!("user-{}", i)).with_right("CourseAdmin");
                dispatcher
                    .dispatch(RpcRequest::get(format!("/grades/list/{}", i)), &ctx)
                    .await
            }
        });

        let swapper = {
            let registry = Arc::clone(&platform.registry);
            let recorder = Arc::clone(&platform.recorder);
            let created = Arc::clone(&platform.profiles_created);
            tokio::spawn(async move {
                for round in 0..10 {
                    let mode = if round % 2 == 0 {
                        MatchMode::Exact
                    } else {
                        MatchMode::WithDescendants
                    };
                    registry.replace(snapshot(mode, &recorder, &created));
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
        };

        let outcomes = join_all(requests).await;
        swapper.await.unwrap();

        // CourseAdmin itself satisfies both modes, so every request succeeds
        assert!(outcomes.iter().all(DispatchOutcome::is_ok));
        assert_eq!(platform.recorder.count(), 64);
        assert_eq!(platform.registry.generation(), 10);
        assert_eq!(dispatcher.metrics().snapshot().ok, 64);

        let current = platform.registry.snapshot();
        assert!(current
            .decisions()
            .contains(&DeclarationKey::for_type("GradeBook")));
    }

    #[tokio::test]
    async fn test_timeout_applies_to_in_flight_handler() {
        let release = Arc::new(Notify::new());
        let batch = RegistryBuilder::new(rights())
            .with_type(TypeDescriptor::new("Batch").secured(SecurityDeclaration::public()))
            .with_component(
                ComponentDescriptor::singleton(
                    "batch",
                    "Batch",
                    Arc::new(Gate {
                        entered: Arc::new(Notify::new()),
                        release: Arc::clone(&release),
                    }),
                )
                .with_entry_point("run", [HttpVerb::Post]),
            )
            .build()
            .unwrap();
        let config = DispatchConfig::default().with_invocation_timeout(Duration::from_millis(25));
        let dispatcher = Dispatcher::with_config(Arc::new(Registry::new(batch)), config).unwrap();

        let outcome = dispatcher
            .dispatch(RpcRequest::post("/batch/run"), &SecurityContext::anonymous())
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::Error {
                message: "Internal server error".to_string()
            }
        );
        assert_eq!(dispatcher.metrics().snapshot().timeouts, 1);
    }
}
