//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use contracts::TelemetryBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    flush: FlushInfo,
    transport: TransportInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    queue_capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flush_interval_secs: Option<u64>,
}

#[derive(Serialize)]
struct FlushInfo {
    flush_timeout_ms: u64,
    max_batch_size: usize,
    dedup_window_ms: u64,
}

#[derive(Serialize)]
struct TransportInfo {
    name: String,
    transport_type: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &TelemetryBlueprint, args: &InfoArgs) -> ConfigInfo {
    let params = if args.params {
        visible_params(blueprint)
    } else {
        BTreeMap::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        flush: FlushInfo {
            flush_timeout_ms: blueprint.flush.flush_timeout_ms,
            max_batch_size: blueprint.flush.max_batch_size,
            dedup_window_ms: blueprint.flush.dedup_window_ms,
        },
        transport: TransportInfo {
            name: blueprint.transport.name.clone(),
            transport_type: format!("{:?}", blueprint.transport.transport_type),
            params,
        },
        queue_capacity: blueprint.queue.capacity,
        flush_interval_secs: blueprint.schedule.interval().map(|d| d.as_secs()),
    }
}

/// Transport params sorted by key, with `api_key` masked
fn visible_params(blueprint: &TelemetryBlueprint) -> BTreeMap<String, String> {
    blueprint
        .transport
        .params
        .iter()
        .map(|(k, v)| {
            let value = if k == "api_key" {
                "********".to_string()
            } else {
                v.clone()
            };
            (k.clone(), value)
        })
        .collect()
}

fn print_config_info(blueprint: &TelemetryBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Telemetry Flush Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let flush = &blueprint.flush;
    println!("⏱  Flush");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Timeout: {} ms", flush.flush_timeout_ms);
    println!("   ├─ Max batch size: {}", flush.max_batch_size);
    println!("   └─ Dedup window: {} ms", flush.dedup_window_ms);

    println!("\n📤 Transport");
    println!(
        "   ├─ {} ({:?})",
        blueprint.transport.name, blueprint.transport.transport_type
    );
    if args.params {
        let params = visible_params(blueprint);
        for (i, (key, value)) in params.iter().enumerate() {
            let prefix = if i == params.len() - 1 { "└─" } else { "├─" };
            println!("   │  {} {} = {}", prefix, key, value);
        }
    }
    println!(
        "   └─ {} params",
        blueprint.transport.params.len()
    );

    println!("\n⚙️  Queue & Schedule");
    match blueprint.queue.capacity {
        Some(capacity) => println!("   ├─ Queue capacity: {}", capacity),
        None => println!("   ├─ Queue capacity: unbounded"),
    }
    match blueprint.schedule.interval() {
        Some(interval) => println!("   └─ Flush interval: {}s", interval.as_secs()),
        None => println!("   └─ Flush interval: disabled"),
    }

    println!();
}
