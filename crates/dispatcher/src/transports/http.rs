//! HttpTransport - JSON POST to a collection endpoint

use bytes::Bytes;
use contracts::{BatchRequest, BatchResponse, ContractError, Transport};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Configuration for HttpTransport
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Collection endpoint URL
    pub endpoint: String,
    /// Bearer token (optional)
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpTransportConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let endpoint = params
            .get("endpoint")
            .ok_or_else(|| "missing 'endpoint' parameter".to_string())?
            .clone();

        let timeout_ms = match params.get("timeout_ms") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| format!("invalid timeout_ms '{}': {}", raw, e))?,
            None => 10_000,
        };

        Ok(Self {
            endpoint,
            api_key: params.get("api_key").cloned(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Transport that POSTs each batch as JSON
pub struct HttpTransport {
    name: String,
    config: HttpTransportConfig,
    client: Client,
}

impl HttpTransport {
    /// Create a new HttpTransport
    pub fn new(name: impl Into<String>, config: HttpTransportConfig) -> Result<Self, ContractError> {
        let name = name.into();
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ContractError::transport(&name, format!("client build failed: {e}")))?;

        debug!(transport = %name, endpoint = %config.endpoint, "HttpTransport created");

        Ok(Self {
            name,
            config,
            client,
        })
    }

    /// Create from params (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = HttpTransportConfig::from_params(params)
            .map_err(|e| ContractError::config_validation("transport.params", e))?;
        Self::new(name, config)
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn encode(&self, request: &BatchRequest) -> Result<Bytes, ContractError> {
        serde_json::to_vec(request)
            .map(Bytes::from)
            .map_err(|e| ContractError::transport(&self.name, format!("json error: {e}")))
    }

    /// Interpret a 2xx body
    ///
    /// Collectors that answer with an empty or non-JSON body are taken to
    /// have accepted the whole batch.
    fn parse_response(&self, body: &[u8], items: usize) -> BatchResponse {
        if body.iter().all(u8::is_ascii_whitespace) {
            return BatchResponse::accepted(items);
        }
        serde_json::from_slice(body).unwrap_or_else(|e| {
            debug!(transport = %self.name, error = %e, "Unparsable response body, assuming accepted");
            BatchResponse::accepted(items)
        })
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_transport_send",
        skip(self, request),
        fields(transport = %self.name, items = request.len())
    )]
    async fn send_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ContractError> {
        let body = self.encode(request)?;
        let bytes = body.len();

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ContractError::transport(&self.name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ContractError::transport(
                &self.name,
                format!("HTTP {}: {}", status, text),
            ));
        }

        let payload = response
            .bytes()
            .await
            .map_err(|e| ContractError::transport(&self.name, e.to_string()))?;

        debug!(transport = %self.name, bytes, status = %status, "Batch posted");
        Ok(self.parse_response(&payload, request.len()))
    }
}
