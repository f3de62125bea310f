//! Mock metadata catalog for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use crate::catalog::{BookResult, CatalogError, CatalogQuery, CatalogSearcher};
use crate::request::CancelSignal;

/// Mock implementation of the [`CatalogSearcher`] trait.
///
/// Queries are recorded before any configured gate or error takes effect, so
/// tests can count issued requests even while one is held in flight.
#[derive(Default)]
pub struct MockCatalog {
    results: RwLock<Vec<BookResult>>,
    searches: RwLock<Vec<CatalogQuery>>,
    next_error: RwLock<Option<CatalogError>>,
    gate: RwLock<Option<Arc<Notify>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the results returned by subsequent searches.
    pub async fn set_results(&self, results: Vec<BookResult>) {
        *self.results.write().await = results;
    }

    /// Queries recorded so far, in call order.
    pub async fn recorded_searches(&self) -> Vec<CatalogQuery> {
        self.searches.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Make the next search fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Hold every subsequent search until the notify is signalled.
    pub async fn set_gate(&self, gate: Arc<Notify>) {
        *self.gate.write().await = Some(gate);
    }

    /// Stop gating searches.
    pub async fn clear_gate(&self) {
        *self.gate.write().await = None;
    }
}

#[async_trait]
impl CatalogSearcher for MockCatalog {
    fn name(&self) -> &str {
        "mock-catalog"
    }

    async fn search(
        &self,
        query: &CatalogQuery,
        _cancel: CancelSignal,
    ) -> Result<Vec<BookResult>, CatalogError> {
        self.searches.write().await.push(query.clone());

        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.results.read().await.clone())
    }
}
