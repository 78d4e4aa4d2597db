//! Flush pipeline metrics
//!
//! Prometheus recording via the `metrics` facade, plus an in-memory
//! aggregator for end-of-run summaries.

use contracts::FlushReport;
use metrics::{counter, gauge, histogram};

/// Record metrics for one completed (or timed-out) flush
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_flush_report;
///
/// if let Some(report) = coordinator.last_report() {
///     record_flush_report(&report);
/// }
/// ```
pub fn record_flush_report(report: &FlushReport) {
    counter!("telemetry_flush_total").increment(1);
    histogram!("telemetry_flush_duration_ms").record(report.duration_ms as f64);

    counter!("telemetry_flush_items_drained_total").increment(report.drained as u64);
    gauge!("telemetry_flush_last_drained").set(report.drained as f64);

    if report.duplicates_dropped > 0 {
        counter!("telemetry_flush_duplicates_dropped_total")
            .increment(report.duplicates_dropped as u64);
    }

    if report.items_dropped > 0 {
        counter!("telemetry_flush_items_dropped_total", "reason" => "transport_failure")
            .increment(report.items_dropped as u64);
    }

    if report.items_abandoned > 0 {
        counter!("telemetry_flush_items_dropped_total", "reason" => "timeout")
            .increment(report.items_abandoned as u64);
    }

    if report.timed_out {
        counter!("telemetry_flush_timeouts_total").increment(1);
    }
}

/// Record a flush request coalesced into an in-flight flush
pub fn record_flush_skipped() {
    counter!("telemetry_flush_skipped_total").increment(1);
}

/// Record one batch dispatch
pub fn record_batch_dispatched(transport: &str, status: &'static str, items: usize) {
    counter!(
        "telemetry_flush_batches_total",
        "transport" => transport.to_string(),
        "status" => status
    )
    .increment(1);
    histogram!("telemetry_flush_batch_size", "transport" => transport.to_string())
        .record(items as f64);
}

/// Record items the collector reported as failed
pub fn record_items_rejected(transport: &str, failed: u64) {
    counter!(
        "telemetry_flush_items_rejected_total",
        "transport" => transport.to_string()
    )
    .increment(failed);
}

/// Flush metrics aggregator
///
/// Aggregates flush reports in memory for summaries.
#[derive(Debug, Clone, Default)]
pub struct FlushMetricsAggregator {
    /// Flushes that ran the pipeline
    pub total_flushes: u64,

    /// Flush requests coalesced into an in-flight flush
    pub skipped_flushes: u64,

    /// Flushes cut short by the deadline
    pub timed_out_flushes: u64,

    /// Items drained from the queue
    pub total_drained: u64,

    /// Near-duplicates removed
    pub total_duplicates: u64,

    /// Batches whose dispatch completed
    pub total_batches: u64,

    /// Batches lost to transport failures
    pub failed_batches: u64,

    /// Items handed to the transport successfully
    pub total_delivered: u64,

    /// Items lost (transport failures + timeouts)
    pub total_lost: u64,

    /// Items the collector reported as failed
    pub total_rejected: u64,

    /// Flush duration statistics
    pub duration_stats: RunningStats,

    /// Drained-per-flush statistics
    pub drained_stats: RunningStats,
}

impl FlushMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one flush report in
    pub fn update(&mut self, report: &FlushReport) {
        self.total_flushes += 1;
        if report.timed_out {
            self.timed_out_flushes += 1;
        }
        self.total_drained += report.drained as u64;
        self.total_duplicates += report.duplicates_dropped as u64;
        self.total_batches += report.batches_dispatched as u64;
        self.failed_batches += report.batches_failed as u64;
        self.total_delivered += report.items_delivered as u64;
        self.total_lost += (report.items_dropped + report.items_abandoned) as u64;
        self.total_rejected += report.items_rejected;

        self.duration_stats.push(report.duration_ms as f64);
        self.drained_stats.push(report.drained as f64);
    }

    /// Count a coalesced flush request
    pub fn record_skipped(&mut self) {
        self.skipped_flushes += 1;
    }

    /// Generate summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_flushes: self.total_flushes,
            skipped_flushes: self.skipped_flushes,
            timed_out_flushes: self.timed_out_flushes,
            total_drained: self.total_drained,
            total_duplicates: self.total_duplicates,
            total_batches: self.total_batches,
            failed_batches: self.failed_batches,
            total_delivered: self.total_delivered,
            total_lost: self.total_lost,
            total_rejected: self.total_rejected,
            loss_rate: if self.total_drained > 0 {
                self.total_lost as f64 / self.total_drained as f64 * 100.0
            } else {
                0.0
            },
            duration_ms: StatsSummary::from(&self.duration_stats),
            drained_per_flush: StatsSummary::from(&self.drained_stats),
        }
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_flushes: u64,
    pub skipped_flushes: u64,
    pub timed_out_flushes: u64,
    pub total_drained: u64,
    pub total_duplicates: u64,
    pub total_batches: u64,
    pub failed_batches: u64,
    pub total_delivered: u64,
    pub total_lost: u64,
    pub total_rejected: u64,
    pub loss_rate: f64,
    pub duration_ms: StatsSummary,
    pub drained_per_flush: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flush Metrics Summary ===")?;
        writeln!(
            f,
            "Flushes: {} (skipped {}, timed out {})",
            self.total_flushes, self.skipped_flushes, self.timed_out_flushes
        )?;
        writeln!(f, "Items drained: {}", self.total_drained)?;
        writeln!(f, "Duplicates dropped: {}", self.total_duplicates)?;
        writeln!(
            f,
            "Batches: {} ({} failed)",
            self.total_batches, self.failed_batches
        )?;
        writeln!(f, "Items delivered: {}", self.total_delivered)?;
        writeln!(
            f,
            "Items lost: {} ({:.2}%)",
            self.total_lost, self.loss_rate
        )?;
        writeln!(f, "Items rejected by collector: {}", self.total_rejected)?;
        writeln!(f, "Flush duration (ms): {}", self.duration_ms)?;
        writeln!(f, "Drained per flush: {}", self.drained_per_flush)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
