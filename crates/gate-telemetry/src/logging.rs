//! Structured logging setup.
//!
//! Logs carry consistent fields so they can be filtered per request:
//! - `service`: Service name from [`TelemetryConfig`]
//! - `component`: Component id the request resolved to
//! - `method`: Entry point name
//! - `request_id`: Per-request correlation id
//! - `reason`: Denial reason for access failures

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber described by `config`.
///
/// JSON output is meant for containers, the pretty formatter for local
/// development. Fails if a global subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("invalid log filter: {}", e)))?;

    let json_layer = (config.console_output && config.json_logs).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    let pretty_layer = (config.console_output && !config.json_logs).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(
        service = %config.full_service_name(),
        json_logs = config.json_logs,
        "Structured logging initialized"
    );

    Ok(())
}

/// Install a test-friendly subscriber that writes through the libtest
/// capture. Safe to call from every test; only the first call wins.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Log an access-control event with the standard fields.
#[macro_export]
macro_rules! log_access {
    ($level:ident, $component:expr, $method:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = %$component,
            method = %$method,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a dispatch event tagged with the request correlation id.
#[macro_export]
macro_rules! log_request {
    ($level:ident, $request_id:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            request_id = %$request_id,
            $($($field)*,)?
            $msg
        )
    };
}
