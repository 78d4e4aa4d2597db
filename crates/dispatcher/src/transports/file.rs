//! FileTransport - appends batches to a JSON-lines file

use contracts::{BatchRequest, BatchResponse, ContractError, Transport};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, instrument};

/// Transport that writes one JSON line per batch
pub struct FileTransport {
    name: String,
    path: PathBuf,
}

impl FileTransport {
    /// Create a new FileTransport, creating the parent directory if needed
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            name: name.into(),
            path,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output/batches.jsonl"));
        Self::new(name, path)
    }

    /// Output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append_line(&self, line: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }
}

impl Transport for FileTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_transport_send",
        skip(self, request),
        fields(transport = %self.name, items = request.len())
    )]
    async fn send_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ContractError> {
        let line = serde_json::to_vec(request)
            .map_err(|e| ContractError::transport(&self.name, format!("json error: {e}")))?;

        self.append_line(&line).await.map_err(|e| {
            error!(transport = %self.name, path = %self.path.display(), error = %e, "Append failed");
            ContractError::transport(&self.name, e.to_string())
        })?;

        debug!(transport = %self.name, bytes = line.len(), "Batch appended");
        Ok(BatchResponse::accepted(request.len()))
    }
}
