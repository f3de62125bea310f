//! Search orchestration controller.
//!
//! Drives the search page's interaction with its two result sources: the
//! book metadata catalog and the download indexers. Typed queries are
//! debounced into at most one trigger per quiet period; each result source
//! has its own cancelable request envelope, so a newer search of one kind
//! supersedes the previous one of that kind while the other kind stays in
//! flight undisturbed. Results are committed on success only: a canceled
//! request can never overwrite state written by a later one.

mod types;

pub use types::{ControllerError, SearchMode, SearchSnapshot};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use crate::audit::{AuditEvent, AuditHandle};
use crate::catalog::{BookResult, CatalogQuery, CatalogSearcher};
use crate::config::SearchConfig;
use crate::debounce::{debounce, DebounceInput};
use crate::indexer::{ReleaseResult, ReleaseSearcher};
use crate::notify::Notifier;
use crate::progress::ProgressTracker;
use crate::request::{Canceled, RequestEnvelope};

#[derive(Default)]
struct SearchState {
    mode: SearchMode,
    query: String,
    books: Vec<BookResult>,
    releases: Vec<ReleaseResult>,
    selected_book: Option<BookResult>,
    error: Option<String>,
    catalog_searching: bool,
    indexer_searching: bool,
}

struct Inner {
    config: SearchConfig,
    catalog: Arc<dyn CatalogSearcher>,
    indexer: Arc<dyn ReleaseSearcher>,
    tracker: ProgressTracker,
    notifier: Notifier,
    audit: Option<AuditHandle>,
    state: RwLock<SearchState>,
    catalog_request: RequestEnvelope,
    indexer_request: RequestEnvelope,
    query_input: Mutex<Option<DebounceInput<String>>>,
    running: AtomicBool,
    shutdown_tx: broadcast::Sender<()>,
}

/// The search controller. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

impl SearchController {
    pub fn new(
        config: SearchConfig,
        catalog: Arc<dyn CatalogSearcher>,
        indexer: Arc<dyn ReleaseSearcher>,
        tracker: ProgressTracker,
        notifier: Notifier,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            inner: Arc::new(Inner {
                config,
                catalog,
                indexer,
                tracker,
                notifier,
                audit: None,
                state: RwLock::new(SearchState::default()),
                catalog_request: RequestEnvelope::new(),
                indexer_request: RequestEnvelope::new(),
                query_input: Mutex::new(None),
                running: AtomicBool::new(false),
                shutdown_tx,
            }),
        }
    }

    /// Attach an audit handle for activity events.
    pub fn with_audit(mut self, audit: AuditHandle) -> Self {
        let inner = Arc::get_mut(&mut self.inner).expect("with_audit called after start");
        inner.audit = Some(audit);
        self
    }

    /// Start the debounce driver. Until this is called, typed queries update
    /// the live state but never settle into a search.
    pub fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            warn!("Search controller already running");
            return;
        }

        let (input, mut output) = debounce(Duration::from_millis(self.inner.config.debounce_ms));
        *self.inner.query_input.lock().unwrap() = Some(input);

        let inner = Arc::clone(&self.inner);
        let mut shutdown_rx = self.inner.shutdown_tx.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    settled = output.recv() => match settled {
                        Some(query) => {
                            // Each settled query is handled in its own task
                            // so a long search never delays the next trigger;
                            // the envelopes serialize same-kind requests.
                            let inner = Arc::clone(&inner);
                            tokio::spawn(async move {
                                inner.on_query_settled(query).await;
                            });
                        }
                        None => break,
                    },
                    _ = shutdown_rx.recv() => break,
                }
            }
            debug!("Search controller driver stopped");
        });
    }

    /// Stop the controller: shut the debounce driver down and cancel any
    /// in-flight requests. No state is written after this returns.
    pub async fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        let _ = self.inner.shutdown_tx.send(());
        self.inner.query_input.lock().unwrap().take();
        self.cancel().await;
    }

    /// Record a keystroke-level query update.
    pub async fn type_query(&self, query: &str) {
        {
            let mut state = self.inner.state.write().await;
            state.query = query.to_string();
        }
        let input = self.inner.query_input.lock().unwrap().clone();
        if let Some(input) = input {
            input.send(query.to_string());
        }
    }

    /// Toggle the search mode, clearing both result lists and the selection
    /// and canceling whatever is in flight.
    pub async fn set_mode(&self, mode: SearchMode) {
        {
            let mut state = self.inner.state.write().await;
            state.mode = mode;
            state.books.clear();
            state.releases.clear();
            state.selected_book = None;
            state.error = None;
            state.catalog_searching = false;
            state.indexer_searching = false;
        }
        self.inner.catalog_request.cancel();
        self.inner.indexer_request.cancel();
    }

    /// Explicit search submission: records the query in the persistent
    /// search history and dispatches immediately, bypassing the debounce.
    pub async fn submit(&self) -> Result<(), ControllerError> {
        let (query, mode) = {
            let state = self.inner.state.read().await;
            (state.query.trim().to_string(), state.mode)
        };

        if query.is_empty() {
            return Err(ControllerError::EmptyQuery);
        }
        let min = self.inner.config.min_query_len;
        if query.chars().count() < min {
            return Err(ControllerError::QueryTooShort { min });
        }

        if let Err(e) = self.inner.tracker.record_search(&query) {
            // History is a convenience; the search itself still proceeds.
            warn!("Failed to record search history: {}", e);
        }

        self.inner.dispatch(query, mode).await;
        Ok(())
    }

    /// Turn a catalog result into an indexer search for its releases.
    ///
    /// The derived query is `"{title} {first_author}"` (title alone when the
    /// catalog has no authors), issued against the indexers regardless of
    /// the current mode.
    pub async fn find_downloads(&self, book_id: &str) -> Result<(), ControllerError> {
        let book = {
            let mut state = self.inner.state.write().await;
            let book = state
                .books
                .iter()
                .find(|b| b.id == book_id)
                .cloned()
                .ok_or_else(|| ControllerError::UnknownBook(book_id.to_string()))?;
            state.selected_book = Some(book.clone());
            book
        };

        self.inner
            .run_indexer_search(book.release_query(), Some(book.title))
            .await;
        Ok(())
    }

    /// Cancel whatever is in flight and reset the searching indicators.
    pub async fn cancel(&self) {
        self.inner.catalog_request.cancel();
        self.inner.indexer_request.cancel();

        let mut state = self.inner.state.write().await;
        state.catalog_searching = false;
        state.indexer_searching = false;
    }

    /// Point-in-time copy of the controller state.
    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.inner.state.read().await;
        let trimmed_len = state.query.trim().chars().count();
        SearchSnapshot {
            mode: state.mode,
            query: state.query.clone(),
            below_min_length: trimmed_len > 0 && trimmed_len < self.inner.config.min_query_len,
            books: state.books.clone(),
            releases: state.releases.clone(),
            selected_book: state.selected_book.clone(),
            error: state.error.clone(),
            catalog_searching: state.catalog_searching,
            indexer_searching: state.indexer_searching,
        }
    }
}

impl Inner {
    /// React to a settled (debounced) query.
    async fn on_query_settled(&self, query: String) {
        let trimmed = query.trim().to_string();

        if trimmed.is_empty() {
            // Clearing the box resets the page without touching in-flight
            // requests beyond the usual cancel-on-new-request rule.
            let mut state = self.state.write().await;
            state.books.clear();
            state.releases.clear();
            state.selected_book = None;
            state.error = None;
            return;
        }

        if trimmed.chars().count() < self.config.min_query_len {
            // Below the minimum: no request; the snapshot exposes the hint.
            return;
        }

        let mode = self.state.read().await.mode;
        self.dispatch(trimmed, mode).await;
    }

    async fn dispatch(&self, query: String, mode: SearchMode) {
        match mode {
            SearchMode::Catalog => {
                {
                    let mut state = self.state.write().await;
                    state.releases.clear();
                    state.selected_book = None;
                }
                self.run_catalog_search(query).await;
            }
            SearchMode::Direct => {
                {
                    let mut state = self.state.write().await;
                    state.books.clear();
                }
                self.run_indexer_search(query, None).await;
            }
        }
    }

    async fn run_catalog_search(&self, query: String) {
        {
            let mut state = self.state.write().await;
            state.catalog_searching = true;
            state.error = None;
        }

        let catalog = Arc::clone(&self.catalog);
        let catalog_query = CatalogQuery {
            text: query.clone(),
            lang_restrict: self.config.lang_restrict.clone(),
            max_results: None,
        };
        let started = Instant::now();

        let outcome = self
            .catalog_request
            .start(|cancel| async move { catalog.search(&catalog_query, cancel).await })
            .await;

        match outcome {
            Err(Canceled) => {
                // Superseded; the newer request owns the state now.
                debug!(query = %query, "Catalog search canceled");
            }
            Ok(Ok(books)) => {
                if let Some(audit) = &self.audit {
                    audit
                        .emit(AuditEvent::CatalogSearchExecuted {
                            query: query.clone(),
                            results_count: books.len() as u32,
                            duration_ms: started.elapsed().as_millis() as u64,
                        })
                        .await;
                }
                let mut state = self.state.write().await;
                state.books = books;
                state.catalog_searching = false;
            }
            Ok(Err(e)) => {
                warn!(query = %query, error = %e, "Catalog search failed");
                if let Some(audit) = &self.audit {
                    audit
                        .emit(AuditEvent::SearchFailed {
                            source: "catalog".to_string(),
                            query: query.clone(),
                            error: e.to_string(),
                        })
                        .await;
                }
                // Indexer results are left alone: the two sources fail
                // independently.
                let mut state = self.state.write().await;
                state.catalog_searching = false;
                state.error = Some(e.to_string());
            }
        }
    }

    async fn run_indexer_search(&self, query: String, derived_from: Option<String>) {
        {
            let mut state = self.state.write().await;
            state.indexer_searching = true;
            state.error = None;
            state.releases.clear();
        }

        let indexer = Arc::clone(&self.indexer);
        let search_query = query.clone();
        let started = Instant::now();

        let outcome = self
            .indexer_request
            .start(|cancel| async move { indexer.search(&search_query, cancel).await })
            .await;

        match outcome {
            Err(Canceled) => {
                debug!(query = %query, "Indexer search canceled");
            }
            Ok(Ok(releases)) => {
                if let Some(audit) = &self.audit {
                    audit
                        .emit(AuditEvent::IndexerSearchExecuted {
                            query: query.clone(),
                            derived_from,
                            results_count: releases.len() as u32,
                            duration_ms: started.elapsed().as_millis() as u64,
                        })
                        .await;
                }
                let mut state = self.state.write().await;
                state.releases = releases;
                state.indexer_searching = false;
            }
            Ok(Err(e)) => {
                warn!(query = %query, error = %e, "Indexer search failed");
                if let Some(audit) = &self.audit {
                    audit
                        .emit(AuditEvent::SearchFailed {
                            source: "indexer".to_string(),
                            query: query.clone(),
                            error: e.to_string(),
                        })
                        .await;
                }
                let message = e.to_string();
                {
                    let mut state = self.state.write().await;
                    state.indexer_searching = false;
                    state.releases.clear();
                    state.error = Some(message.clone());
                }
                self.notifier.error(format!(
                    "{}. Check if indexers are enabled and available.",
                    message
                ));
            }
        }
    }
}
