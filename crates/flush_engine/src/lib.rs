//! # Flush Engine
//!
//! Moves queued telemetry items to a transport.
//!
//! A flush drains the durable queue in one step, drops near-duplicate events,
//! splits the rest into size-bounded chunks and hands each chunk to the
//! dispatcher in order. At most one flush runs at a time and every flush is
//! bounded by `flush_timeout`.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use flush_engine::{FlushCoordinator, MemoryQueue};
//! use dispatcher::LogTransport;
//!
//! let queue = Arc::new(MemoryQueue::new());
//! let coordinator = FlushCoordinator::new(queue.clone(), LogTransport::new("log"), Default::default())?;
//!
//! queue.enqueue(item).await;
//! coordinator.flush().await;
//! ```

pub mod batcher;
pub mod clock;
mod coordinator;
pub mod dedup;
mod queue;
mod scheduler;

#[cfg(test)]
mod test_support;

pub use batcher::chunk;
pub use clock::{format_timestamp, parse_timestamp};
pub use contracts::{FlushConfig, FlushReport, FlushStage, FlushState};
pub use coordinator::FlushCoordinator;
pub use dedup::{dedup_key, DedupOutcome, Deduplicator};
pub use queue::MemoryQueue;
pub use scheduler::{FlushScheduler, FlushSchedulerHandle};
