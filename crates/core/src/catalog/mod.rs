//! Book metadata catalog integration.
//!
//! This module provides a client for querying an external book-metadata
//! catalog (the Google Books volumes API) and normalizing its nested
//! response shape into the flat [`BookResult`] records the rest of the
//! system works with.

mod google_books;
mod types;

pub use google_books::{GoogleBooksClient, GoogleBooksConfig, DEFAULT_VOLUMES_ENDPOINT};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::request::CancelSignal;

/// Errors that can occur when querying the metadata catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Catalog API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse catalog response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for book metadata catalog backends.
#[async_trait]
pub trait CatalogSearcher: Send + Sync {
    /// Provider name for logging/audit.
    fn name(&self) -> &str;

    /// Execute a catalog search, returning normalized book records.
    async fn search(
        &self,
        query: &CatalogQuery,
        cancel: CancelSignal,
    ) -> Result<Vec<BookResult>, CatalogError>;
}
