//! Terminal dispatch outcomes, as rendered by the transport layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::DenyReason;

/// How a request ended.
///
/// `NotFound` never says which lookup failed; `Error` never carries handler
/// details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    NotFound,
    Forbidden { reason: DenyReason },
    Ok { value: Value },
    Error { message: String },
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, DispatchOutcome::Ok { .. })
    }

    /// Caller-facing text of a denial.
    pub fn reason_text(&self) -> Option<&'static str> {
        match self {
            DispatchOutcome::Forbidden { reason } => Some(reason.message()),
            _ => None,
        }
    }

    /// Conventional HTTP status for the outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchOutcome::NotFound => 404,
            DispatchOutcome::Forbidden { .. } => 403,
            DispatchOutcome::Ok { .. } => 200,
            DispatchOutcome::Error { .. } => 500,
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::NotFound => "not_found",
            DispatchOutcome::Forbidden { .. } => "forbidden",
            DispatchOutcome::Ok { .. } => "ok",
            DispatchOutcome::Error { .. } => "error",
        }
    }
}
