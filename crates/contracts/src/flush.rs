//! FlushState - coordinator lifecycle flag

use serde::{Deserialize, Serialize};

/// Whether a flush is currently in flight.
///
/// Only the coordinator mutates this; everyone else observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushState {
    #[default]
    Idle,
    Flushing,
}

impl FlushState {
    pub fn from_flag(flushing: bool) -> Self {
        if flushing {
            Self::Flushing
        } else {
            Self::Idle
        }
    }

    pub fn is_flushing(self) -> bool {
        matches!(self, Self::Flushing)
    }
}

/// Pipeline position within one flush
///
/// `Draining -> Deduplicating -> Chunking -> Dispatching(1..=n) -> Done`,
/// with `TimedOut` reachable from any stage once the deadline fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FlushStage {
    #[default]
    Draining,
    Deduplicating,
    Chunking,
    Dispatching {
        batch: usize,
        of: usize,
    },
    Done,
    TimedOut,
}

/// Per-flush accounting, produced by the coordinator
///
/// Filled in as the pipeline advances, so a timed-out flush still reports
/// the stages it reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushReport {
    /// Last stage reached
    pub stage: FlushStage,

    /// Items taken from the durable queue
    pub drained: usize,

    /// Near-duplicates removed by the deduplicator
    pub duplicates_dropped: usize,

    /// Chunks produced by the batcher
    pub batches_planned: usize,

    /// Chunks whose dispatch completed (delivered or not)
    pub batches_dispatched: usize,

    /// Chunks lost to a transport failure
    pub batches_failed: usize,

    /// Items handed to the transport successfully
    pub items_delivered: usize,

    /// Items lost with failed chunks
    pub items_dropped: usize,

    /// Items the collector reported as failed
    pub items_rejected: u64,

    /// Items abandoned because the deadline fired first
    pub items_abandoned: usize,

    /// Deadline fired before the pipeline finished
    pub timed_out: bool,

    /// Wall time spent (milliseconds)
    pub duration_ms: u64,
}

impl FlushReport {
    /// Items that survived dedup
    pub fn unique_items(&self) -> usize {
        self.drained.saturating_sub(self.duplicates_dropped)
    }
}
