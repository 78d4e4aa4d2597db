//! Shared fakes for engine tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use contracts::{BatchRequest, BatchResponse, ContractError, DurableQueue, Item, Transport};

pub(crate) fn event(name: &str, ts: &str) -> Item {
    Item::event(name, ts)
}

/// `count` distinct events with strictly increasing names
pub(crate) fn events(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| event(&format!("e{i}"), "2024-05-01T12:00:00.000Z"))
        .collect()
}

/// Records every batch that finished its send, in completion order.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    delay: Duration,
    fail_calls: HashSet<usize>,
    rejected: u64,
    calls: AtomicUsize,
    completed: Mutex<Vec<Vec<Item>>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the given 1-based calls
    pub(crate) fn failing_on(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.fail_calls = calls.into_iter().collect();
        self
    }

    pub(crate) fn rejecting(mut self, failed: u64) -> Self {
        self.rejected = failed;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn completed(&self) -> Vec<Vec<Item>> {
        self.completed.lock().unwrap().clone()
    }

    pub(crate) fn completed_sizes(&self) -> Vec<usize> {
        self.completed().iter().map(Vec::len).collect()
    }
}

impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ContractError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.completed.lock().unwrap().push(request.batch.clone());

        if self.fail_calls.contains(&call) {
            return Err(ContractError::transport("recording", "connection reset"));
        }

        let total = request.len() as u64;
        let failed = self.rejected.min(total);
        Ok(BatchResponse {
            processed: Some(total - failed),
            failed,
        })
    }
}

/// Queue whose drain always fails.
pub(crate) struct BrokenQueue;

impl DurableQueue for BrokenQueue {
    async fn dequeue_all(&self) -> Result<Vec<Item>, ContractError> {
        Err(ContractError::queue("storage unavailable"))
    }
}

/// In-memory log sink for asserting on emitted tracing output.
#[derive(Clone, Default)]
pub(crate) struct LogCapture {
    buf: std::sync::Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
