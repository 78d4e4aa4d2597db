//! Transport trait - delivery of one batch to the collection endpoint

use crate::{BatchRequest, BatchResponse, ContractError};

/// Batch transport
///
/// The pipeline never retries, so implementations need not be idempotent.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one batch
    ///
    /// # Errors
    /// Returns `ContractError::TransportFailure` for network/protocol errors
    async fn send_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ContractError>;
}
