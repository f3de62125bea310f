//! Indexer aggregator search client.
//!
//! Talks to the library backend's `/api/search/books` endpoint, which fans
//! the query out to the configured Prowlarr indexers and returns release
//! candidates. Older backend builds return a bare JSON array, newer ones wrap
//! it in `{"results": [...]}`; both shapes are accepted here so the rest of
//! the system never sees the difference.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::request::CancelSignal;

use super::types::ReleaseResult;
use super::{IndexerError, ReleaseSearcher};

/// Aggregator client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Backend base URL, e.g. "http://localhost:8000".
    pub api_base: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Indexer aggregator client.
pub struct AggregatorSearcher {
    client: Client,
    config: AggregatorConfig,
}

#[derive(Serialize)]
struct SearchRequestBody<'a> {
    query: &'a str,
    search_type: &'a str,
}

impl AggregatorSearcher {
    /// Create a new aggregator searcher.
    pub fn new(config: AggregatorConfig) -> Result<Self, IndexerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| IndexerError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/api/search/books",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl ReleaseSearcher for AggregatorSearcher {
    fn name(&self) -> &str {
        "aggregator"
    }

    async fn search(
        &self,
        query: &str,
        cancel: CancelSignal,
    ) -> Result<Vec<ReleaseResult>, IndexerError> {
        debug!(query = %query, "Indexer search");

        let response = self
            .client
            .post(self.search_url())
            .json(&SearchRequestBody {
                query,
                search_type: "search",
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IndexerError::Timeout
                } else if e.is_connect() {
                    IndexerError::ConnectionFailed(e.to_string())
                } else {
                    IndexerError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IndexerError::ApiError(e.to_string()))?;

        if !status.is_success() {
            // An error-class status means the indexers themselves failed; an
            // empty result set with 2xx is the distinct "no matches" case.
            warn!(status = status.as_u16(), "Indexer search failed");
            return Err(IndexerError::Unavailable {
                status: status.as_u16(),
            });
        }

        let parsed: SearchResponseBody =
            serde_json::from_str(&body).map_err(|e| IndexerError::ParseError(e.to_string()))?;

        if cancel.is_canceled() {
            return Ok(vec![]);
        }

        let releases = normalize_search_response(parsed);
        debug!(results = releases.len(), "Indexer search complete");
        Ok(releases)
    }
}

/// Response body in either of the two supported shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponseBody {
    /// Legacy shape: a bare array of results.
    Bare(Vec<RawRelease>),
    /// Current shape: results wrapped in an object.
    Wrapped { results: Vec<RawRelease> },
}

/// Raw release record as emitted by the aggregator.
#[derive(Debug, Deserialize)]
pub struct RawRelease {
    pub title: String,
    pub download_url: String,
    #[serde(default)]
    pub indexer_id: i64,
    #[serde(default)]
    pub indexer_name: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub size_mb: Option<f64>,
    #[serde(default)]
    pub seeders: u32,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub info_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub file_format: Option<String>,
}

/// Map either response shape into normalized release records.
pub fn normalize_search_response(body: SearchResponseBody) -> Vec<ReleaseResult> {
    let raw = match body {
        SearchResponseBody::Bare(results) => results,
        SearchResponseBody::Wrapped { results } => results,
    };

    raw.into_iter()
        .map(|r| {
            let size_mb = r
                .size_mb
                .unwrap_or_else(|| (r.size_bytes as f64 / 1024.0 / 1024.0 * 100.0).round() / 100.0);
            ReleaseResult {
                title: r.title,
                download_url: r.download_url,
                indexer_id: r.indexer_id,
                indexer_name: r.indexer_name,
                size_bytes: r.size_bytes,
                size_mb,
                seeders: r.seeders,
                protocol: r.protocol.unwrap_or_else(|| "torrent".to_string()),
                publish_date: r.publish_date.as_deref().and_then(parse_publish_date),
                info_url: r.info_url,
                categories: r.categories,
                file_format: r.file_format,
            }
        })
        .collect()
}

/// Parse the aggregator's publish date (ISO 8601, possibly without zone).
fn parse_publish_date(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}
