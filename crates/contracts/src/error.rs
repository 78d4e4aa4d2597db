//! Layered error definitions
//!
//! Categorized by source: config / clock / dedup / transport / queue

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Item Errors =====
    /// Event timestamp does not follow the wire format
    #[error("malformed timestamp '{value}': {message}")]
    MalformedTimestamp { value: String, message: String },

    /// Event params could not be canonicalized into a dedup key
    #[error("key serialization failed for event '{event}': {message}")]
    KeySerialization { event: String, message: String },

    /// Batch built from an empty chunk
    #[error("batch request must contain at least one item")]
    EmptyBatch,

    // ===== Delivery Errors =====
    /// Transport-level failure (network, protocol, non-success status)
    #[error("transport '{transport}' failed: {message}")]
    TransportFailure { transport: String, message: String },

    /// Durable queue failed to hand over its contents
    #[error("queue error: {message}")]
    QueueFailure { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create malformed timestamp error
    pub fn malformed_timestamp(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create transport failure
    pub fn transport(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportFailure {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create queue failure
    pub fn queue(message: impl Into<String>) -> Self {
        Self::QueueFailure {
            message: message.into(),
        }
    }
}
