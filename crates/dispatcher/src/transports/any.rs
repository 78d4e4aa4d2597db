//! AnyTransport - config-selected transport

use contracts::{
    BatchRequest, BatchResponse, ContractError, Transport, TransportConfig, TransportType,
};
use tracing::instrument;

use super::{FileTransport, HttpTransport, LogTransport};
use crate::error::DispatcherError;

/// One of the built-in transports, chosen at runtime from configuration
pub enum AnyTransport {
    Http(HttpTransport),
    File(FileTransport),
    Log(LogTransport),
}

impl Transport for AnyTransport {
    fn name(&self) -> &str {
        match self {
            Self::Http(t) => t.name(),
            Self::File(t) => t.name(),
            Self::Log(t) => t.name(),
        }
    }

    async fn send_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ContractError> {
        match self {
            Self::Http(t) => t.send_batch(request).await,
            Self::File(t) => t.send_batch(request).await,
            Self::Log(t) => t.send_batch(request).await,
        }
    }
}

/// Create a transport from configuration
#[instrument(
    name = "dispatcher_create_transport",
    skip(config),
    fields(transport = %config.name, transport_type = ?config.transport_type)
)]
pub fn create_transport(config: &TransportConfig) -> Result<AnyTransport, DispatcherError> {
    match config.transport_type {
        TransportType::Log => Ok(AnyTransport::Log(LogTransport::new(&config.name))),
        TransportType::File => {
            let transport = FileTransport::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::transport_creation(&config.name, e.to_string()))?;
            Ok(AnyTransport::File(transport))
        }
        TransportType::Http => {
            let transport = HttpTransport::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::transport_creation(&config.name, e.to_string()))?;
            Ok(AnyTransport::Http(transport))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Item;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_create_log_transport() {
        let config = TransportConfig {
            name: "test_log".to_string(),
            transport_type: TransportType::Log,
            params: HashMap::new(),
        };

        let transport = create_transport(&config).unwrap();
        assert!(matches!(transport, AnyTransport::Log(_)));
        assert_eq!(transport.name(), "test_log");

        let request =
            BatchRequest::new(vec![Item::event("open", "2024-05-01T10:00:00.000Z")]).unwrap();
        let response = transport.send_batch(&request).await.unwrap();
        assert_eq!(response.failed, 0);
    }

    #[test]
    fn test_create_http_transport_without_endpoint_fails() {
        let config = TransportConfig {
            name: "collector".to_string(),
            transport_type: TransportType::Http,
            params: HashMap::new(),
        };

        let err = create_transport(&config).err().unwrap();
        assert!(matches!(err, DispatcherError::TransportCreation { .. }));
        assert!(err.to_string().contains("endpoint"), "got: {err}");
    }

    #[test]
    fn test_create_file_transport() {
        let dir = tempfile::tempdir().unwrap();
        let config = TransportConfig {
            name: "file".to_string(),
            transport_type: TransportType::File,
            params: HashMap::from([(
                "path".to_string(),
                dir.path().join("b.jsonl").display().to_string(),
            )]),
        };

        let transport = create_transport(&config).unwrap();
        assert!(matches!(transport, AnyTransport::File(_)));
    }
}
