//! TelemetryBlueprint - Config Loader output
//!
//! Describes the complete delivery setup: flush budgets, transport routing,
//! queue bounds and the periodic flush schedule.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::ContractError;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete delivery configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Flush budgets
    #[serde(default)]
    pub flush: FlushConfig,

    /// Where batches go
    pub transport: TransportConfig,

    /// In-memory queue bounds
    #[serde(default)]
    pub queue: QueueConfig,

    /// Periodic flush trigger
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Flush budgets
///
/// Constants for the lifetime of a coordinator, tunable at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushConfig {
    /// Hard ceiling for one flush (milliseconds)
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,

    /// Maximum items per batch request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Near-duplicate window (milliseconds)
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,
}

fn default_flush_timeout_ms() -> u64 {
    5_000
}

fn default_max_batch_size() -> usize {
    100
}

fn default_dedup_window_ms() -> u64 {
    50
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            flush_timeout_ms: default_flush_timeout_ms(),
            max_batch_size: default_max_batch_size(),
            dedup_window_ms: default_dedup_window_ms(),
        }
    }
}

impl FlushConfig {
    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }

    /// Check the budgets a coordinator cannot run without
    ///
    /// # Errors
    /// `ContractError::ConfigValidation` naming the offending field
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.flush_timeout_ms == 0 {
            return Err(ContractError::config_validation(
                "flush.flush_timeout_ms",
                "flush_timeout_ms must be > 0",
            ));
        }
        if self.max_batch_size == 0 {
            return Err(ContractError::config_validation(
                "flush.max_batch_size",
                "max_batch_size must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Transport type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    /// JSON POST to a collection endpoint
    Http,
    /// Append batches to a JSON-lines file
    File,
    /// Log batch summaries only
    Log,
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Transport name
    pub name: String,

    /// Transport type
    pub transport_type: TransportType,

    /// Type-specific parameters (endpoint, path, api_key, ...)
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// In-memory queue bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum queued items, oldest evicted beyond it (None = unbounded)
    #[serde(default)]
    pub capacity: Option<usize>,
}

/// Periodic flush trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between periodic flushes (0 = disabled)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    /// Interval, `None` when periodic flushing is disabled
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}
