//! Periodic and on-demand flush triggering.

use std::sync::Arc;
use std::time::Duration;

use contracts::{DurableQueue, Transport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::coordinator::FlushCoordinator;

/// Background task that flushes on a fixed interval and on request.
pub struct FlushScheduler;

impl FlushScheduler {
    /// Start the flush loop on the current runtime.
    ///
    /// The first tick fires one `interval` after spawning. Ticks missed while
    /// a flush is running are skipped rather than replayed.
    pub fn spawn<Q, T>(
        coordinator: Arc<FlushCoordinator<Q, T>>,
        interval: Duration,
    ) -> FlushSchedulerHandle
    where
        Q: DurableQueue + Sync + 'static,
        T: Transport + Sync + 'static,
    {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let worker = tokio::spawn(run_loop(coordinator, interval, trigger_rx));

        info!(interval_ms = interval.as_millis() as u64, "Flush scheduler started");

        FlushSchedulerHandle { trigger_tx, worker }
    }
}

/// Handle for a running [`FlushScheduler`]
pub struct FlushSchedulerHandle {
    trigger_tx: mpsc::Sender<()>,
    worker: JoinHandle<()>,
}

impl FlushSchedulerHandle {
    /// Request an immediate flush.
    ///
    /// Returns `false` when a request is already pending or the loop has
    /// stopped. Pending requests coalesce into one flush.
    pub fn trigger(&self) -> bool {
        self.trigger_tx.try_send(()).is_ok()
    }

    /// Stop the loop after one final flush.
    pub async fn shutdown(self) {
        drop(self.trigger_tx);
        if let Err(e) = self.worker.await {
            error!(error = %e, "Flush scheduler task failed");
        }
    }
}

async fn run_loop<Q, T>(
    coordinator: Arc<FlushCoordinator<Q, T>>,
    interval: Duration,
    mut trigger_rx: mpsc::Receiver<()>,
) where
    Q: DurableQueue + Sync,
    T: Transport + Sync,
{
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("Scheduled flush");
                coordinator.flush().await;
            }
            request = trigger_rx.recv() => match request {
                Some(()) => {
                    debug!("Triggered flush");
                    coordinator.flush().await;
                }
                None => break,
            },
        }
    }

    info!("Flush scheduler stopping, running final flush");
    coordinator.flush().await;
}
