//! Single-flight, deadline-bounded flush orchestration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{ContractError, DurableQueue, FlushConfig, FlushReport, FlushStage, FlushState, Transport};
use dispatcher::{DispatchOutcome, Dispatcher, MetricsSnapshot};
use observability::{FlushMetricsAggregator, MetricsSummary};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::batcher;
use crate::dedup::Deduplicator;

/// Drives queued items to a transport.
///
/// `flush` never returns an error and never runs twice concurrently. A call
/// made while another flush is in progress returns immediately without
/// touching the queue. Every flush finishes within `flush_timeout`; chunks
/// not yet dispatched when the deadline fires are discarded.
pub struct FlushCoordinator<Q, T> {
    queue: Arc<Q>,
    dispatcher: Dispatcher<T>,
    deduplicator: Deduplicator,
    config: FlushConfig,
    flushing: AtomicBool,
    stats: Mutex<FlushMetricsAggregator>,
    last_report: Mutex<Option<FlushReport>>,
}

impl<Q, T> FlushCoordinator<Q, T>
where
    Q: DurableQueue + Sync,
    T: Transport + Sync,
{
    pub fn new(queue: Arc<Q>, transport: T, config: FlushConfig) -> Result<Self, ContractError> {
        config.validate()?;

        Ok(Self {
            queue,
            dispatcher: Dispatcher::new(transport),
            deduplicator: Deduplicator::new(config.dedup_window()),
            config,
            flushing: AtomicBool::new(false),
            stats: Mutex::new(FlushMetricsAggregator::new()),
            last_report: Mutex::new(None),
        })
    }

    pub fn state(&self) -> FlushState {
        FlushState::from_flag(self.flushing.load(Ordering::Acquire))
    }

    pub fn config(&self) -> &FlushConfig {
        &self.config
    }

    pub fn queue(&self) -> &Arc<Q> {
        &self.queue
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Dispatch counters accumulated across all flushes
    pub fn dispatch_snapshot(&self) -> MetricsSnapshot {
        self.dispatcher.snapshot()
    }

    /// Report of the most recent flush that ran (skipped calls excluded)
    pub fn last_report(&self) -> Option<FlushReport> {
        lock(&self.last_report).clone()
    }

    pub fn summary(&self) -> MetricsSummary {
        lock(&self.stats).summary()
    }

    /// Run one flush.
    #[instrument(name = "flush", skip(self), fields(transport = %self.dispatcher.transport_name()))]
    pub async fn flush(&self) {
        let Some(_guard) = FlushGuard::acquire(&self.flushing) else {
            info!("Flush already in progress, skipping");
            observability::record_flush_skipped();
            lock(&self.stats).record_skipped();
            return;
        };

        let started = Instant::now();
        let timeout = self.config.flush_timeout();
        let mut report = FlushReport::default();

        let timed_out = tokio::select! {
            () = self.run_pipeline(&mut report) => false,
            () = tokio::time::sleep(timeout) => true,
        };

        report.duration_ms = started.elapsed().as_millis() as u64;

        if timed_out {
            let dispatched = report.items_delivered + report.items_dropped;
            report.items_abandoned = report.unique_items().saturating_sub(dispatched);
            report.timed_out = true;
            warn!(
                stage = ?report.stage,
                timeout_ms = timeout.as_millis() as u64,
                abandoned = report.items_abandoned,
                "flush timed out, remaining items dropped"
            );
            report.stage = FlushStage::TimedOut;
        } else {
            report.stage = FlushStage::Done;
            info!(
                drained = report.drained,
                duplicates = report.duplicates_dropped,
                batches = report.batches_dispatched,
                delivered = report.items_delivered,
                dropped = report.items_dropped,
                duration_ms = report.duration_ms,
                "Flush complete"
            );
        }

        observability::record_flush_report(&report);
        lock(&self.stats).update(&report);
        *lock(&self.last_report) = Some(report);
    }

    /// Drain, dedupe, chunk, dispatch. Progress is written into `report` as
    /// it happens so a cancelled run still accounts for finished work.
    async fn run_pipeline(&self, report: &mut FlushReport) {
        report.stage = FlushStage::Draining;
        let items = match self.queue.dequeue_all().await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Queue drain failed, ending flush");
                return;
            }
        };
        report.drained = items.len();

        if items.is_empty() {
            debug!("Queue empty, nothing to send");
            return;
        }

        report.stage = FlushStage::Deduplicating;
        let outcome = self.deduplicator.dedupe_with_stats(items);
        report.duplicates_dropped = outcome.dropped;

        report.stage = FlushStage::Chunking;
        let chunks = batcher::chunk(outcome.items, self.config.max_batch_size);
        let total = chunks.len();
        report.batches_planned = total;
        debug!(items = report.unique_items(), batches = total, "Planned batches");

        for (index, chunk) in chunks.into_iter().enumerate() {
            report.stage = FlushStage::Dispatching {
                batch: index + 1,
                of: total,
            };

            match self.dispatcher.send(chunk).await {
                DispatchOutcome::Delivered { items } => {
                    report.items_delivered += items;
                }
                DispatchOutcome::PartialFailure { items, failed, .. } => {
                    report.items_delivered += items;
                    report.items_rejected += failed;
                }
                DispatchOutcome::TransportFailed { items } => {
                    report.batches_failed += 1;
                    report.items_dropped += items;
                }
                DispatchOutcome::Skipped => continue,
            }
            report.batches_dispatched += 1;
        }
    }
}

/// Holds the flushing flag; clears it on every exit path, including
/// cancellation of the enclosing future.
struct FlushGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlushGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
