//! # Dispatcher
//!
//! Batch delivery.
//!
//! Responsibilities:
//! - Turn one chunk into a `BatchRequest` and hand it to a transport
//! - Classify the outcome (delivered / partial failure / transport failure)
//! - Never retry, never re-queue: every failure is terminal for its chunk

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod transports;

pub use contracts::{BatchRequest, BatchResponse, Transport};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use transports::{
    create_transport, AnyTransport, FileTransport, HttpTransport, HttpTransportConfig,
    LogTransport,
};
