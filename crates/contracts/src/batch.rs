//! BatchRequest / BatchResponse - the unit exchanged with a transport

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContractError, Item};

/// One network request worth of items
///
/// Always non-empty; size is bounded by the caller (the batcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Items in drain order
    pub batch: Vec<Item>,

    /// Instant the request was built (UTC)
    #[serde(with = "sent_at_format")]
    pub sent_at: DateTime<Utc>,
}

impl BatchRequest {
    /// Build a request stamped with the current time
    ///
    /// # Errors
    /// `ContractError::EmptyBatch` when `items` is empty
    pub fn new(items: Vec<Item>) -> Result<Self, ContractError> {
        Self::with_sent_at(items, Utc::now())
    }

    pub fn with_sent_at(items: Vec<Item>, sent_at: DateTime<Utc>) -> Result<Self, ContractError> {
        if items.is_empty() {
            return Err(ContractError::EmptyBatch);
        }
        Ok(Self {
            batch: items,
            sent_at,
        })
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}

/// Collector verdict for one request
///
/// `failed` can be nonzero even though the request itself succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Items accepted (collectors may omit it)
    #[serde(default)]
    pub processed: Option<u64>,

    /// Items rejected
    #[serde(default)]
    pub failed: u64,
}

impl BatchResponse {
    /// Response reporting every item accepted
    pub fn accepted(count: usize) -> Self {
        Self {
            processed: Some(count as u64),
            failed: 0,
        }
    }

    /// `processed` (0 when absent) plus `failed`
    pub fn total(&self) -> u64 {
        self.processed.unwrap_or(0) + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

mod sent_at_format {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
