//! Download submission.
//!
//! Turns a selected release candidate plus a user-chosen media category into
//! a single submission to the download-client action behind the library
//! backend, tracking per-release in-flight state and updating the persisted
//! download counter.

mod coordinator;
mod http;

pub use coordinator::DownloadCoordinator;
pub use http::{HttpDownloadClient, HttpDownloadConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indexer::MediaCategory;

/// Errors that can occur during download submission.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Release has no download URL")]
    MissingDownloadUrl,

    #[error("Download already in progress for this release")]
    AlreadyInFlight,

    #[error("Download client connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Download submission rejected: {0}")]
    Rejected(String),

    #[error("Download client API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Progress tracking failed: {0}")]
    Progress(String),
}

/// A download submission as sent to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub download_url: String,
    pub title: String,
    /// Wire field is `media_type` to match the backend contract.
    #[serde(rename = "media_type")]
    pub media_category: MediaCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    pub indexer_id: i64,
}

/// Trait for download submission backends.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Client name for logging/audit.
    fn name(&self) -> &str;

    /// Submit a single download request.
    async fn submit(&self, request: &DownloadRequest) -> Result<(), DownloadError>;
}
