//! Shared test harness: an app wired to mock upstream backends.

use std::sync::Arc;

use axum::Router;
use evolibrary_core::testing::{fixtures, MockCatalog, MockDownloadClient, MockIndexer};
use evolibrary_core::{
    create_audit_system, AuditStore, BookResult, CatalogSearcher, Config, DownloadClient,
    DownloadCoordinator, MemoryProgressStore, Notifier, ProgressTracker, ReleaseResult,
    ReleaseSearcher, SearchController, SqliteAuditStore,
};

// Test binaries only use what their own tests need.
#[allow(dead_code)]
pub struct TestApp {
    router: Router,
    pub catalog: Arc<MockCatalog>,
    pub indexer: Arc<MockIndexer>,
    pub downloader: Arc<MockDownloadClient>,
}

impl TestApp {
    pub async fn new() -> Self {
        let catalog = Arc::new(MockCatalog::new());
        let indexer = Arc::new(MockIndexer::new());
        let downloader = Arc::new(MockDownloadClient::new());

        let audit_store: Arc<dyn AuditStore> =
            Arc::new(SqliteAuditStore::in_memory().expect("audit store"));
        let (audit_handle, audit_writer) = create_audit_system(Arc::clone(&audit_store), 100);
        tokio::spawn(audit_writer.run());

        let tracker = ProgressTracker::new(Arc::new(MemoryProgressStore::new()));
        let notifier = Notifier::default();
        let config = Config::default();

        let downloads = DownloadCoordinator::new(
            Arc::clone(&downloader) as Arc<dyn DownloadClient>,
            tracker.clone(),
            notifier.clone(),
            Some(audit_handle.clone()),
        );

        let make_controller: Box<dyn Fn() -> SearchController + Send + Sync> = {
            let search_config = config.search.clone();
            let catalog = Arc::clone(&catalog);
            let indexer = Arc::clone(&indexer);
            let tracker = tracker.clone();
            let notifier = notifier.clone();
            let audit_handle = audit_handle.clone();
            Box::new(move || {
                SearchController::new(
                    search_config.clone(),
                    Arc::clone(&catalog) as Arc<dyn CatalogSearcher>,
                    Arc::clone(&indexer) as Arc<dyn ReleaseSearcher>,
                    tracker.clone(),
                    notifier.clone(),
                )
                .with_audit(audit_handle.clone())
            })
        };

        let state = Arc::new(evolibrary_server::state::AppState::new(
            config,
            downloads,
            tracker,
            notifier,
            audit_handle,
            audit_store,
            make_controller,
        ));

        Self {
            router: evolibrary_server::api::create_router(state),
            catalog,
            indexer,
            downloader,
        }
    }

    /// Clone of the router for a oneshot call.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Create a session via the API and return its ID.
    pub async fn create_session(&self) -> String {
        use axum::body::Body;
        use axum::http::Request;
        use http_body_util::BodyExt;
        use tower::util::ServiceExt;

        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/sessions")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["id"].as_str().unwrap().to_string()
    }
}

pub fn book(id: &str, title: &str, authors: &[&str]) -> BookResult {
    fixtures::book(id, title, authors)
}

pub fn release(title: &str, download_url: &str) -> ReleaseResult {
    fixtures::release(title, download_url)
}
