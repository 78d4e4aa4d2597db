//! Item - unit of telemetry held by the durable queue
//!
//! Only `Event` items take part in deduplication; every other variant passes
//! through the pipeline untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event parameters, a JSON object whose key order carries no meaning
pub type Params = Map<String, Value>;

/// Queued telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// Named analytics event
    Event(Payload),

    /// Associates the device with a user
    Identify {
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        traits: Option<Params>,
    },

    /// Associates the user with a group/organisation
    Group {
        group_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        traits: Option<Params>,
    },
}

impl Item {
    /// Shorthand for an event without params
    pub fn event(name: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::Event(Payload::new(name, timestamp))
    }

    pub fn identify(user_id: impl Into<String>) -> Self {
        Self::Identify {
            user_id: user_id.into(),
            traits: None,
        }
    }

    pub fn group(group_id: impl Into<String>) -> Self {
        Self::Group {
            group_id: group_id.into(),
            traits: None,
        }
    }

    /// Event payload, if this item is an event
    pub fn as_event(&self) -> Option<&Payload> {
        match self {
            Self::Event(payload) => Some(payload),
            _ => None,
        }
    }

    /// Variant label (used for logging/metrics)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Event(_) => "event",
            Self::Identify { .. } => "identify",
            Self::Group { .. } => "group",
        }
    }
}

/// Event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Event name (e.g., "button_click")
    pub name: String,

    /// Wire timestamp, RFC 3339 with fractional seconds
    pub timestamp: String,

    /// Optional event parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Payload {
    pub fn new(name: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: timestamp.into(),
            params: None,
        }
    }

    /// Attach params
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }
}
