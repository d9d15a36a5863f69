//! # TG-04 RPC Dispatcher
//!
//! Routes `component/function[/rest]` requests to registered components,
//! enforcing the registry's access check before any handler runs.
//!
//! ## Outcomes
//!
//! | Outcome | When |
//! |---------|------|
//! | `NotFound` | malformed path, unknown component, unknown function, verb mismatch |
//! | `Forbidden { reason }` | the access check denied the call |
//! | `Ok { value }` | the handler returned a value |
//! | `Error { message }` | the handler failed or timed out; details are only logged |
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: a denied request never reaches the handler
//! - **INVARIANT-2**: `NotFound` is identical for every resolution failure
//! - **INVARIANT-3**: handler error details never reach the caller
//! - **INVARIANT-4**: a request uses one registry snapshot from start to end
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(Arc::new(Registry::new(snapshot)));
//! let ctx = SecurityContext::user("alice").with_right("CourseAdmin.Grades");
//! match dispatcher.dispatch(RpcRequest::get("/courses/grades"), &ctx).await {
//!     DispatchOutcome::Ok { value } => render(value),
//!     DispatchOutcome::Forbidden { reason } => deny(reason.message()),
//!     other => fail(other.status_code()),
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod metrics;

// Re-exports for convenience
pub use config::{DispatchConfig, GENERIC_ERROR_MESSAGE};
pub use dispatcher::Dispatcher;
pub use domain::{parse_path, DispatchOutcome, RequestId, RequestPath, RpcRequest, RpcTarget};
pub use error::{ConfigError, PathError};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
