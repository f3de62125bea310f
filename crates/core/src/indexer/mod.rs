//! Download-indexer search integration.
//!
//! The indexer aggregator (Prowlarr behind the library backend) exposes a
//! single search endpoint returning downloadable release candidates. This
//! module normalizes both its legacy (bare array) and current (wrapped
//! object) response shapes into [`ReleaseResult`] records.

mod aggregator;
mod types;

pub use aggregator::{AggregatorConfig, AggregatorSearcher};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::request::CancelSignal;

/// Errors that can occur during indexer searches.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Indexer connection failed: {0}")]
    ConnectionFailed(String),

    /// Error-class status from the aggregator; the indexers themselves are
    /// likely down or misconfigured. Distinct from an empty result set.
    #[error("Indexers may be unavailable or search failed (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("Indexer API error: {0}")]
    ApiError(String),

    #[error("Failed to parse indexer response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for release search backends.
#[async_trait]
pub trait ReleaseSearcher: Send + Sync {
    /// Provider name for logging/audit.
    fn name(&self) -> &str;

    /// Execute a search, returning normalized release candidates.
    ///
    /// An empty vec is a legitimate "no matches" outcome; indexer
    /// unavailability surfaces as [`IndexerError::Unavailable`].
    async fn search(
        &self,
        query: &str,
        cancel: CancelSignal,
    ) -> Result<Vec<ReleaseResult>, IndexerError>;
}
