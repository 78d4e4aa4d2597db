//! Near-duplicate event suppression.
//!
//! Two events are duplicates when they share a [`dedup_key`] and their
//! timestamps are strictly less than `window` apart. The first occurrence is
//! kept. Identify and group items are never deduplicated.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use contracts::{ContractError, Item, Params, Payload};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::clock::parse_timestamp;

/// Result of one dedup pass
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    /// Surviving items, in input order
    pub items: Vec<Item>,
    /// Number of events removed
    pub dropped: usize,
}

/// Stateless per call: the seen-map starts empty on every pass.
#[derive(Debug, Clone, Copy)]
pub struct Deduplicator {
    window: Duration,
}

impl Deduplicator {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Remove near-duplicate events, preserving order.
    pub fn dedupe(&self, items: Vec<Item>) -> Vec<Item> {
        self.dedupe_with_stats(items).items
    }

    #[instrument(name = "dedupe", skip_all, fields(items = items.len(), window_ms = self.window.as_millis() as u64))]
    pub fn dedupe_with_stats(&self, items: Vec<Item>) -> DedupOutcome {
        let window = TimeDelta::from_std(self.window).unwrap_or(TimeDelta::MAX);
        let mut last_seen: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut kept = Vec::with_capacity(items.len());
        let mut dropped = 0usize;

        for item in items {
            let Item::Event(payload) = &item else {
                kept.push(item);
                continue;
            };

            let instant = match parse_timestamp(&payload.timestamp) {
                Ok(instant) => instant,
                Err(e) => {
                    warn!(event = %payload.name, error = %e, "Unparsable event timestamp, keeping event");
                    kept.push(item);
                    continue;
                }
            };

            let key = dedup_key(payload);
            if let Some(previous) = last_seen.get(&key) {
                let elapsed = (instant - *previous).abs();
                if elapsed < window {
                    warn!(
                        event = %payload.name,
                        elapsed_ms = elapsed.num_milliseconds(),
                        "Dropping duplicate event"
                    );
                    dropped += 1;
                    continue;
                }
            }

            last_seen.insert(key, instant);
            kept.push(item);
        }

        if dropped > 0 {
            info!(dropped, kept = kept.len(), "Removed duplicate events");
        } else {
            debug!(kept = kept.len(), "No duplicate events");
        }

        DedupOutcome {
            items: kept,
            dropped,
        }
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

/// Identity used for duplicate detection.
///
/// `name` alone, or `name:{json}` where `{json}` is the params object with
/// keys sorted at every depth.
pub fn dedup_key(payload: &Payload) -> String {
    let Some(params) = &payload.params else {
        return payload.name.clone();
    };

    match canonical_json(&payload.name, params) {
        Ok(json) => format!("{}:{}", payload.name, json),
        Err(e) => {
            warn!(event = %payload.name, error = %e, "Falling back to name-only dedup key");
            payload.name.clone()
        }
    }
}

fn canonical_json(event: &str, params: &Params) -> Result<String, ContractError> {
    serde_json::to_string(&canonical_map(params)).map_err(|e| ContractError::KeySerialization {
        event: event.to_string(),
        message: e.to_string(),
    })
}

fn canonical_map(map: &Params) -> BTreeMap<&str, Value> {
    map.iter()
        .map(|(k, v)| (k.as_str(), canonical_value(v)))
        .collect()
}

fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            canonical_map(map)
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}
