//! # Gate Telemetry
//!
//! Logging setup shared by Tenant-Gate services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gate_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_component("dispatch");
//!     init_telemetry(&config).expect("Failed to init telemetry");
//!
//!     // Application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TG_SERVICE_NAME` | `tenant-gate` | Service name in logs |
//! | `TG_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `TG_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `TG_JSON_LOGS` | `false` (`true` in containers) | JSON formatting |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for a Tenant-Gate process.
///
/// Call once at startup, before the registry is built, so configuration
/// errors are reported through the same pipeline as request logs.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)
}

/// Convenience macro for creating a span with component context.
///
/// # Example
///
/// ```rust,ignore
/// use gate_telemetry::component_span;
///
/// let _span = component_span!("dispatch", component = "courses", method = "grades").entered();
/// ```
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
