//! Flush runner - wires queue, transport, coordinator and scheduler.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::TelemetryBlueprint;
use dispatcher::Transport;
use flush_engine::{FlushCoordinator, FlushScheduler, MemoryQueue};
use tracing::info;

use super::{load_items, RunStats};

/// Flush run configuration
#[derive(Debug, Clone)]
pub struct FlushRunConfig {
    /// Loaded and validated blueprint
    pub blueprint: TelemetryBlueprint,

    /// Items to enqueue before the first flush
    pub input: Option<PathBuf>,

    /// Flush once and return
    pub once: bool,
}

pub struct FlushRunner {
    config: FlushRunConfig,
}

impl FlushRunner {
    pub fn new(config: FlushRunConfig) -> Self {
        Self { config }
    }

    /// Run until done (`once`) or until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<RunStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        let queue = Arc::new(MemoryQueue::bounded(blueprint.queue.capacity));
        let mut seeded = 0;
        if let Some(ref path) = self.config.input {
            let items = load_items(path).await?;
            seeded = items.len();
            queue.enqueue_all(items).await;
            info!(items = seeded, path = %path.display(), "Queue seeded");
        }

        let transport = dispatcher::create_transport(&blueprint.transport)
            .context("Failed to create transport")?;
        info!(
            transport = %transport.name(),
            kind = ?blueprint.transport.transport_type,
            "Transport ready"
        );

        let coordinator = Arc::new(
            FlushCoordinator::new(queue.clone(), transport, blueprint.flush)
                .context("Invalid flush configuration")?,
        );

        if self.config.once {
            coordinator.flush().await;
        } else {
            match blueprint.schedule.interval() {
                Some(interval) => {
                    let scheduler = FlushScheduler::spawn(coordinator.clone(), interval);
                    if seeded > 0 {
                        scheduler.trigger();
                    }
                    shutdown.await;
                    info!("Shutting down scheduler");
                    scheduler.shutdown().await;
                }
                None => {
                    info!("No flush interval configured, flushing on shutdown only");
                    shutdown.await;
                    coordinator.flush().await;
                }
            }
        }

        Ok(RunStats {
            duration: start_time.elapsed(),
            transport: coordinator.dispatcher().transport_name().to_string(),
            seeded,
            evicted: queue.evicted(),
            remaining: queue.len().await,
            flush: coordinator.summary(),
            dispatch: coordinator.dispatch_snapshot(),
            last_report: coordinator.last_report(),
        })
    }
}
