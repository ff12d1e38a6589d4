//! Transport metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single transport
#[derive(Debug, Default)]
pub struct TransportMetrics {
    /// Total successful sends
    send_count: AtomicU64,
    /// Total send failures (after any retry)
    failure_count: AtomicU64,
    /// Total reconnect attempts (reliable stream only)
    reconnect_count: AtomicU64,
}

impl TransportMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total send count
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::Relaxed)
    }

    /// Increment send count
    pub fn inc_send_count(&self) {
        self.send_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get reconnect count
    pub fn reconnect_count(&self) -> u64 {
        self.reconnect_count.load(Ordering::Relaxed)
    }

    /// Increment reconnect count
    pub fn inc_reconnect_count(&self) {
        self.reconnect_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            send_count: self.send_count(),
            failure_count: self.failure_count(),
            reconnect_count: self.reconnect_count(),
        }
    }
}

/// Snapshot of transport metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub send_count: u64,
    pub failure_count: u64,
    pub reconnect_count: u64,
}
