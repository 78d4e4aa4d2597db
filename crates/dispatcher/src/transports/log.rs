//! LogTransport - logs batch summaries via tracing

use contracts::{BatchRequest, BatchResponse, ContractError, Item, Transport};
use tracing::{info, instrument};

/// Transport that only logs what it would have sent
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    /// Create a new LogTransport with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_batch_summary(&self, request: &BatchRequest) {
        let events = request
            .batch
            .iter()
            .filter(|item| matches!(item, Item::Event(_)))
            .count();

        info!(
            transport = %self.name,
            items = request.len(),
            events,
            other = request.len() - events,
            sent_at = %request.sent_at,
            "BatchRequest received"
        );
    }
}

impl Transport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_transport_send",
        skip(self, request),
        fields(transport = %self.name, items = request.len())
    )]
    async fn send_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ContractError> {
        self.log_batch_summary(request);
        Ok(BatchResponse::accepted(request.len()))
    }
}
