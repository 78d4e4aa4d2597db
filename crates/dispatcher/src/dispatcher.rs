//! Dispatcher - sends one chunk and classifies the outcome

use tracing::{debug, instrument, warn};

use contracts::{BatchRequest, Item, Transport};

use crate::metrics::{DispatchMetrics, MetricsSnapshot};

/// What happened to one chunk
///
/// Informational only: no outcome leads to a resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Transport accepted the batch, collector reported no failures
    Delivered { items: usize },

    /// Transport accepted the batch, collector rejected some items
    PartialFailure { items: usize, failed: u64, total: u64 },

    /// Transport failed, the whole chunk is gone
    TransportFailed { items: usize },

    /// Empty chunk, nothing sent
    Skipped,
}

impl DispatchOutcome {
    /// Items in the chunk
    pub fn items(&self) -> usize {
        match *self {
            Self::Delivered { items }
            | Self::PartialFailure { items, .. }
            | Self::TransportFailed { items } => items,
            Self::Skipped => 0,
        }
    }

    /// Whether the transport took the batch
    pub fn reached_transport(&self) -> bool {
        matches!(self, Self::Delivered { .. } | Self::PartialFailure { .. })
    }

    /// Metric label
    pub fn status(&self) -> &'static str {
        match self {
            Self::Delivered { .. } => "delivered",
            Self::PartialFailure { .. } => "partial_failure",
            Self::TransportFailed { .. } => "transport_failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Per-chunk sender on top of a transport
pub struct Dispatcher<T> {
    transport: T,
    metrics: DispatchMetrics,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher over `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            metrics: DispatchMetrics::new(),
        }
    }

    /// Transport name
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Send one chunk
    ///
    /// Never fails: transport errors drop the chunk, collector-side
    /// failures are logged and the chunk counts as handled.
    #[instrument(
        name = "dispatcher_send",
        skip(self, chunk),
        fields(transport = %self.transport.name(), items = chunk.len())
    )]
    pub async fn send(&self, chunk: Vec<Item>) -> DispatchOutcome {
        let items = chunk.len();
        let request = match BatchRequest::new(chunk) {
            Ok(request) => request,
            Err(_) => {
                debug!(transport = %self.transport.name(), "Empty chunk, nothing to send");
                return DispatchOutcome::Skipped;
            }
        };

        let outcome = match self.transport.send_batch(&request).await {
            Ok(response) if response.has_failures() => {
                let total = response.total();
                warn!(
                    transport = %self.transport.name(),
                    failed = response.failed,
                    total,
                    "Collector reported {} of {} items failed",
                    response.failed,
                    total
                );
                self.metrics.record_sent(items);
                self.metrics.record_rejected(response.failed);
                observability::record_items_rejected(self.transport.name(), response.failed);
                DispatchOutcome::PartialFailure {
                    items,
                    failed: response.failed,
                    total,
                }
            }
            Ok(response) => {
                debug!(
                    transport = %self.transport.name(),
                    processed = ?response.processed,
                    "Batch delivered"
                );
                self.metrics.record_sent(items);
                DispatchOutcome::Delivered { items }
            }
            Err(e) => {
                warn!(
                    transport = %self.transport.name(),
                    items,
                    error = %e,
                    "Batch send failed, dropping chunk"
                );
                self.metrics.record_failed(items);
                DispatchOutcome::TransportFailed { items }
            }
        };

        observability::record_batch_dispatched(self.transport.name(), outcome.status(), items);
        outcome
    }
}
