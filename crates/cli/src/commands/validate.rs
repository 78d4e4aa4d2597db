//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{TelemetryBlueprint, TransportType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    transport: String,
    transport_type: String,
    flush_timeout_ms: u64,
    max_batch_size: usize,
    dedup_window_ms: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    transport: blueprint.transport.name.clone(),
                    transport_type: format!("{:?}", blueprint.transport.transport_type),
                    flush_timeout_ms: blueprint.flush.flush_timeout_ms,
                    max_batch_size: blueprint.flush.max_batch_size,
                    dedup_window_ms: blueprint.flush.dedup_window_ms,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &TelemetryBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.flush.dedup_window_ms == 0 {
        warnings.push("flush.dedup_window_ms is 0 - deduplication is disabled".to_string());
    }

    if blueprint.schedule.interval().is_none() {
        warnings.push(
            "schedule.interval_secs is 0 - items are only flushed on shutdown".to_string(),
        );
    }

    if blueprint.transport.transport_type == TransportType::Log {
        warnings.push("log transport selected - batches are not delivered anywhere".to_string());
    }

    if blueprint.queue.capacity.is_none() {
        warnings.push("queue.capacity unset - queue may grow without bound".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!(
                "  Transport: {} ({})",
                summary.transport, summary.transport_type
            );
            println!("  Flush timeout: {} ms", summary.flush_timeout_ms);
            println!("  Max batch size: {}", summary.max_batch_size);
            println!("  Dedup window: {} ms", summary.dedup_window_ms);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
