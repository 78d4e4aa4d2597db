//! Run statistics.

use std::time::Duration;

use contracts::FlushReport;
use dispatcher::MetricsSnapshot;
use observability::MetricsSummary;

/// Statistics from one CLI run
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Transport name from configuration
    pub transport: String,

    /// Items loaded from the input file
    pub seeded: usize,

    /// Items evicted by the bounded queue
    pub evicted: u64,

    /// Items still queued at exit
    pub remaining: usize,

    /// Aggregated flush statistics
    pub flush: MetricsSummary,

    /// Dispatcher counters
    pub dispatch: MetricsSnapshot,

    /// Most recent flush
    pub last_report: Option<FlushReport>,
}

impl RunStats {
    /// Delivered items as a percentage of seeded items
    pub fn delivery_rate(&self) -> f64 {
        if self.seeded > 0 {
            self.dispatch.items_delivered as f64 / self.seeded as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===\n");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Transport: {}", self.transport);
        println!("Items seeded: {}", self.seeded);
        if self.evicted > 0 {
            println!("Items evicted (queue full): {}", self.evicted);
        }
        println!("Items remaining in queue: {}", self.remaining);
        println!("Delivery rate: {:.2}%", self.delivery_rate());

        println!("\n=== Dispatch ===");
        println!(
            "Batches: {} sent, {} failed",
            self.dispatch.batches_sent, self.dispatch.batches_failed
        );
        println!(
            "Items: {} delivered, {} dropped, {} rejected",
            self.dispatch.items_delivered, self.dispatch.items_dropped, self.dispatch.items_rejected
        );
        println!("Partial failures: {}", self.dispatch.partial_failures);

        println!();
        print!("{}", self.flush);

        if let Some(ref report) = self.last_report {
            println!("Last flush: {:?} in {} ms", report.stage, report.duration_ms);
        }
        println!();
    }
}
