//! Dispatch counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::DispatchOutcome;

/// Outcome counters, updated lock-free on every request.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    pub requests_total: AtomicU64,
    pub not_found: AtomicU64,
    pub forbidden: AtomicU64,
    pub ok: AtomicU64,
    pub errors: AtomicU64,
    pub timeouts: AtomicU64,
    pub invocations: AtomicU64,

    pub total_latency_us: AtomicU64,
}

/// Point-in-time copy of [`DispatchMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub not_found: u64,
    pub forbidden: u64,
    pub ok: u64,
    pub errors: u64,
    pub timeouts: u64,
    pub invocations: u64,
    pub average_latency_us: u64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_outcome(&self, outcome: &DispatchOutcome, latency_us: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            DispatchOutcome::NotFound => &self.not_found,
            DispatchOutcome::Forbidden { .. } => &self.forbidden,
            DispatchOutcome::Ok { .. } => &self.ok,
            DispatchOutcome::Error { .. } => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
    }

    /// Record that a handler was actually entered
    pub fn record_invocation(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an abandoned invocation
    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests_total = self.requests_total.load(Ordering::Relaxed);
        let total_latency = self.total_latency_us.load(Ordering::Relaxed);
        MetricsSnapshot {
            requests_total,
            not_found: self.not_found.load(Ordering::Relaxed),
            forbidden: self.forbidden.load(Ordering::Relaxed),
            ok: self.ok.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            invocations: self.invocations.load(Ordering::Relaxed),
            average_latency_us: total_latency.checked_div(requests_total).unwrap_or(0),
        }
    }
}
