//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{FlushRunConfig, FlushRunner};

/// Execute the `run` command
pub async fn run_flush(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(timeout_ms) = args.flush_timeout_ms {
        info!(timeout_ms, "Overriding flush timeout from CLI");
        blueprint.flush.flush_timeout_ms = timeout_ms;
    }
    if let Some(max) = args.max_batch_size {
        info!(max_batch_size = max, "Overriding max batch size from CLI");
        blueprint.flush.max_batch_size = max;
    }
    if let Some(secs) = args.interval_secs {
        info!(interval_secs = secs, "Overriding flush interval from CLI");
        blueprint.schedule.interval_secs = secs;
    }
    blueprint
        .flush
        .validate()
        .context("Invalid flush settings after CLI overrides")?;

    info!(
        transport = %blueprint.transport.name,
        flush_timeout_ms = blueprint.flush.flush_timeout_ms,
        max_batch_size = blueprint.flush.max_batch_size,
        dedup_window_ms = blueprint.flush.dedup_window_ms,
        "Configuration loaded"
    );

    let runner = FlushRunner::new(FlushRunConfig {
        blueprint,
        input: args.input.clone(),
        once: args.once,
    });

    let stats = runner
        .run(shutdown_signal())
        .await
        .context("Flush run failed")?;

    info!(
        seeded = stats.seeded,
        delivered = stats.dispatch.items_delivered,
        lost = stats.flush.total_lost,
        duration_secs = stats.duration.as_secs_f64(),
        "Run completed"
    );
    stats.print_summary();

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => warn!("Received Ctrl+C"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                warn!("Received SIGTERM");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
