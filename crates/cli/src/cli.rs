//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Telemetry Flush - deliver queued telemetry in bounded batches
#[derive(Parser, Debug)]
#[command(
    name = "telemetry-flush",
    author,
    version,
    about = "Flush queued telemetry events to a collector",
    long_about = "Drains a local telemetry queue, removes near-duplicate events, \n\
                  splits the rest into bounded batches and sends them to the \n\
                  configured transport. Failed batches are dropped, never retried."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TELEMETRY_FLUSH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TELEMETRY_FLUSH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed a queue and flush it
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "telemetry.toml",
        env = "TELEMETRY_FLUSH_CONFIG"
    )]
    pub config: PathBuf,

    /// JSON-lines file of items to enqueue before flushing
    #[arg(short, long, env = "TELEMETRY_FLUSH_INPUT")]
    pub input: Option<PathBuf>,

    /// Flush once and exit instead of running the scheduler
    #[arg(long)]
    pub once: bool,

    /// Override the scheduled flush interval in seconds (0 = trigger-only)
    #[arg(long, env = "TELEMETRY_FLUSH_INTERVAL_SECS")]
    pub interval_secs: Option<u64>,

    /// Override flush timeout in milliseconds
    #[arg(long, env = "TELEMETRY_FLUSH_TIMEOUT_MS")]
    pub flush_timeout_ms: Option<u64>,

    /// Override maximum items per batch
    #[arg(long, env = "TELEMETRY_FLUSH_MAX_BATCH_SIZE")]
    pub max_batch_size: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TELEMETRY_FLUSH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "telemetry.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "telemetry.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show transport parameters
    #[arg(long)]
    pub params: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
