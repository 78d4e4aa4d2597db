//! DurableQueue trait - where accepted items wait for a flush
//!
//! Persistence and enqueue mechanics are owned by the implementor; the flush
//! pipeline only ever drains.

use crate::{ContractError, Item};

/// Durable item queue
#[trait_variant::make(DurableQueue: Send)]
pub trait LocalDurableQueue {
    /// Atomically remove and return everything currently queued, in enqueue order
    ///
    /// Two concurrent callers must never observe the same item.
    ///
    /// # Errors
    /// Returns `ContractError::QueueFailure` if the backing store is unreadable
    async fn dequeue_all(&self) -> Result<Vec<Item>, ContractError>;
}
