//! In-memory durable queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{ContractError, DurableQueue, Item};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Process-local [`DurableQueue`].
///
/// Survives nothing beyond the process; used by the CLI and in tests. With a
/// capacity set, enqueueing into a full queue evicts the oldest item.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    items: Mutex<VecDeque<Item>>,
    capacity: Option<usize>,
    evicted: AtomicU64,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub async fn enqueue(&self, item: Item) {
        let mut items = self.items.lock().await;
        self.push(&mut items, item);
    }

    pub async fn enqueue_all(&self, batch: impl IntoIterator<Item = Item>) {
        let mut items = self.items.lock().await;
        for item in batch {
            self.push(&mut items, item);
        }
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Items evicted because the queue was full
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    fn push(&self, items: &mut VecDeque<Item>, item: Item) {
        if let Some(capacity) = self.capacity {
            if items.len() >= capacity {
                if let Some(oldest) = items.pop_front() {
                    self.evicted.fetch_add(1, Ordering::Relaxed);
                    warn!(capacity, kind = oldest.kind(), "Queue full, evicting oldest item");
                }
            }
        }
        items.push_back(item);
    }
}

impl DurableQueue for MemoryQueue {
    async fn dequeue_all(&self) -> Result<Vec<Item>, ContractError> {
        let drained = std::mem::take(&mut *self.items.lock().await);
        debug!(count = drained.len(), "Drained queue");
        Ok(drained.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(i: usize) -> Item {
        Item::event(format!("e{i}"), "2024-05-01T12:00:00.000Z")
    }

    #[tokio::test]
    async fn test_dequeue_all_takes_everything_in_order() {
        let queue = MemoryQueue::new();
        queue.enqueue_all((0..5).map(event)).await;
        assert_eq!(queue.len().await, 5);

        let drained = queue.dequeue_all().await.unwrap();

        assert_eq!(drained, (0..5).map(event).collect::<Vec<_>>());
        assert!(queue.is_empty().await);
        assert!(queue.dequeue_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bounded_queue_evicts_oldest() {
        let queue = MemoryQueue::bounded(Some(3));
        for i in 0..5 {
            queue.enqueue(event(i)).await;
        }

        assert_eq!(queue.evicted(), 2);
        let drained = queue.dequeue_all().await.unwrap();
        assert_eq!(drained, vec![event(2), event(3), event(4)]);
    }

    #[tokio::test]
    async fn test_unbounded_by_default() {
        let queue = MemoryQueue::new();
        queue.enqueue_all((0..1_000).map(event)).await;
        assert_eq!(queue.len().await, 1_000);
        assert_eq!(queue.capacity(), None);
        assert_eq!(queue.evicted(), 0);
    }
}
