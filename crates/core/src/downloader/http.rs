//! HTTP download submission client.
//!
//! Posts submissions to the library backend's `/api/search/download`
//! endpoint, which forwards them to the configured download client (Deluge,
//! qBittorrent, ...). Failure bodies carry an optional `{"detail": ...}`
//! message which is surfaced verbatim.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DownloadClient, DownloadError, DownloadRequest};

/// HTTP download client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpDownloadConfig {
    /// Backend base URL, e.g. "http://localhost:8000".
    pub api_base: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// HTTP client for the download-submission endpoint.
pub struct HttpDownloadClient {
    client: Client,
    config: HttpDownloadConfig,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: Option<String>,
}

impl HttpDownloadClient {
    /// Create a new download client.
    pub fn new(config: HttpDownloadConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| DownloadError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn submit_url(&self) -> String {
        format!(
            "{}/api/search/download",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl DownloadClient for HttpDownloadClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(&self, request: &DownloadRequest) -> Result<(), DownloadError> {
        debug!(title = %request.title, "Submitting download");

        let response = self
            .client
            .post(self.submit_url())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DownloadError::Timeout
                } else if e.is_connect() {
                    DownloadError::ConnectionFailed(e.to_string())
                } else {
                    DownloadError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(title = %request.title, "Download submitted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorDetail>(&body)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or_else(|| format!("HTTP {}", status));

        Err(DownloadError::Rejected(detail))
    }
}
