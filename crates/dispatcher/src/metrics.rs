//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime counters for one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Batches the transport accepted (including partial failures)
    batches_sent: AtomicU64,
    /// Batches lost to transport failures
    batches_failed: AtomicU64,
    /// Items handed over in accepted batches
    items_delivered: AtomicU64,
    /// Items lost with failed batches
    items_dropped: AtomicU64,
    /// Accepted batches that reported failed items
    partial_failures: AtomicU64,
    /// Items the collector reported as failed
    items_rejected: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches_sent(&self) -> u64 {
        self.batches_sent.load(Ordering::Relaxed)
    }

    pub fn batches_failed(&self) -> u64 {
        self.batches_failed.load(Ordering::Relaxed)
    }

    pub fn items_delivered(&self) -> u64 {
        self.items_delivered.load(Ordering::Relaxed)
    }

    pub fn items_dropped(&self) -> u64 {
        self.items_dropped.load(Ordering::Relaxed)
    }

    pub fn partial_failures(&self) -> u64 {
        self.partial_failures.load(Ordering::Relaxed)
    }

    pub fn items_rejected(&self) -> u64 {
        self.items_rejected.load(Ordering::Relaxed)
    }

    /// Count an accepted batch
    pub fn record_sent(&self, items: usize) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.items_delivered
            .fetch_add(items as u64, Ordering::Relaxed);
    }

    /// Count a batch lost to a transport failure
    pub fn record_failed(&self, items: usize) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
        self.items_dropped.fetch_add(items as u64, Ordering::Relaxed);
    }

    /// Count collector-side item failures
    pub fn record_rejected(&self, failed: u64) {
        self.partial_failures.fetch_add(1, Ordering::Relaxed);
        self.items_rejected.fetch_add(failed, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_sent: self.batches_sent(),
            batches_failed: self.batches_failed(),
            items_delivered: self.items_delivered(),
            items_dropped: self.items_dropped(),
            partial_failures: self.partial_failures(),
            items_rejected: self.items_rejected(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches_sent: u64,
    pub batches_failed: u64,
    pub items_delivered: u64,
    pub items_dropped: u64,
    pub partial_failures: u64,
    pub items_rejected: u64,
}
