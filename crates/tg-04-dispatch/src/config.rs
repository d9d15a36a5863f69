//! Dispatcher configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Message returned to callers for any handler failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound for one handler invocation; `0` disables the limit.
    pub invocation_timeout_ms: u64,
    /// Text callers receive instead of handler error details
    pub generic_error_message: String,
    /// Longest request path accepted before resolution
    pub max_path_len: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            invocation_timeout_ms: 30_000,
            generic_error_message: GENERIC_ERROR_MESSAGE.to_string(),
            max_path_len: 2048,
        }
    }
}

impl DispatchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_path_len == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_path_len cannot be 0".into(),
            ));
        }
        if self.generic_error_message.trim().is_empty() {
            return Err(ConfigError::InvalidMessage(
                "generic_error_message cannot be blank".into(),
            ));
        }
        if self.invocation_timeout_ms > 24 * 60 * 60 * 1000 {
            return Err(ConfigError::InvalidTimeout(format!(
                "{}ms exceeds one day",
                self.invocation_timeout_ms
            )));
        }
        Ok(())
    }

    /// Builder-style method to set the invocation timeout
    pub fn with_invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn invocation_timeout(&self) -> Option<Duration> {
        (self.invocation_timeout_ms > 0).then(|| Duration::from_millis(self.invocation_timeout_ms))
    }
}
