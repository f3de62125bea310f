//! End-to-end search flow tests against mock backends.

use std::sync::Arc;
use std::time::Duration;

use evolibrary_core::controller::{SearchController, SearchMode};
use evolibrary_core::indexer::{IndexerError, MediaCategory};
use evolibrary_core::notify::{NotificationKind, Notifier};
use evolibrary_core::progress::{MemoryProgressStore, ProgressTracker};
use evolibrary_core::testing::{fixtures, MockCatalog, MockDownloadClient, MockIndexer};
use evolibrary_core::{
    CatalogSearcher, DownloadClient, DownloadCoordinator, ReleaseSearcher, SearchConfig,
};
use tokio::task::yield_now;

struct World {
    controller: SearchController,
    catalog: Arc<MockCatalog>,
    indexer: Arc<MockIndexer>,
    downloader: Arc<MockDownloadClient>,
    coordinator: DownloadCoordinator,
    tracker: ProgressTracker,
    notifier: Notifier,
}

fn world() -> World {
    let catalog = Arc::new(MockCatalog::new());
    let indexer = Arc::new(MockIndexer::new());
    let downloader = Arc::new(MockDownloadClient::new());
    let tracker = ProgressTracker::new(Arc::new(MemoryProgressStore::new()));
    let notifier = Notifier::default();

    let controller = SearchController::new(
        SearchConfig::default(),
        Arc::clone(&catalog) as Arc<dyn CatalogSearcher>,
        Arc::clone(&indexer) as Arc<dyn ReleaseSearcher>,
        tracker.clone(),
        notifier.clone(),
    );
    let coordinator = DownloadCoordinator::new(
        Arc::clone(&downloader) as Arc<dyn DownloadClient>,
        tracker.clone(),
        notifier.clone(),
        None,
    );

    World {
        controller,
        catalog,
        indexer,
        downloader,
        coordinator,
        tracker,
        notifier,
    }
}

async fn settle() {
    for _ in 0..20 {
        yield_now().await;
    }
}

/// Typing "dune" in catalog mode settles into exactly one catalog request;
/// selecting a result's "find downloads" issues exactly one indexer request
/// with the derived title+author query.
#[tokio::test(start_paused = true)]
async fn catalog_search_then_find_downloads() {
    let w = world();
    w.catalog
        .set_results(vec![
            fixtures::book("v1", "Dune", &["Frank Herbert"]),
            fixtures::book("v2", "Dune Messiah", &["Frank Herbert"]),
        ])
        .await;
    w.indexer
        .set_results(vec![
            fixtures::release("Dune - Frank Herbert [epub]", "https://dl/1"),
            fixtures::release("Dune (unabridged) [m4b]", "https://dl/2"),
        ])
        .await;

    w.controller.start();
    w.controller.set_mode(SearchMode::Catalog).await;

    for q in ["d", "du", "dun", "dune"] {
        w.controller.type_query(q).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(Duration::from_millis(600)).await;
    settle().await;

    // Exactly one catalog request for the settled query.
    let searches = w.catalog.recorded_searches().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].text, "dune");

    let snapshot = w.controller.snapshot().await;
    assert_eq!(snapshot.books.len(), 2);
    assert!(snapshot.selected_book.is_none());
    assert_eq!(w.indexer.search_count().await, 0);

    w.controller.find_downloads("v1").await.unwrap();

    assert_eq!(
        w.indexer.recorded_searches().await,
        vec!["Dune Frank Herbert"]
    );
    let snapshot = w.controller.snapshot().await;
    assert_eq!(snapshot.selected_book.as_ref().unwrap().title, "Dune");
    assert_eq!(snapshot.releases.len(), 2);

    w.controller.stop().await;
}

/// An indexer search answered with HTTP 400 and no results is reported as
/// indexer unavailability, not as an empty result set.
#[tokio::test]
async fn indexer_error_status_is_not_zero_results() {
    let w = world();
    w.indexer
        .set_next_error(IndexerError::Unavailable { status: 400 })
        .await;

    w.controller.type_query("dune").await;
    w.controller.submit().await.unwrap();

    let snapshot = w.controller.snapshot().await;
    assert!(snapshot.releases.is_empty());
    let error = snapshot.error.expect("error must be surfaced");
    assert!(error.to_lowercase().contains("unavailable"));

    let toasts = w.notifier.active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, NotificationKind::Error);
}

/// The full page flow: search, pick a release, submit it for download.
#[tokio::test]
async fn search_select_and_submit_download() {
    let w = world();
    w.indexer
        .set_results(vec![fixtures::release(
            "Dune - Frank Herbert [epub]",
            "https://dl/1",
        )])
        .await;

    w.controller.type_query("dune frank herbert").await;
    w.controller.submit().await.unwrap();

    let snapshot = w.controller.snapshot().await;
    let release = snapshot.releases.first().expect("release expected");

    w.coordinator
        .submit(release, release.media_category())
        .await
        .unwrap();

    let submitted = w.downloader.submitted().await;
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].download_url, "https://dl/1");
    assert_eq!(submitted[0].media_category, MediaCategory::Ebook);

    let counters = w.tracker.counters().unwrap();
    assert_eq!(counters.search_count, 1);
    assert_eq!(counters.download_count, 1);

    // One success toast from the submission.
    assert!(w
        .notifier
        .active()
        .iter()
        .any(|n| n.kind == NotificationKind::Success));
}

/// A superseding search wins even when the older request resolves later.
#[tokio::test]
async fn stale_response_never_overwrites_newer_state() {
    let w = world();
    let gate = Arc::new(tokio::sync::Notify::new());

    w.indexer.set_gate(Arc::clone(&gate)).await;
    w.controller.type_query("dune").await;
    let stale = {
        let controller = w.controller.clone();
        tokio::spawn(async move { controller.submit().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    w.indexer.clear_gate().await;
    w.indexer
        .set_results(vec![fixtures::release("fresh", "https://dl/fresh")])
        .await;
    w.controller.type_query("dune messiah").await;
    w.controller.submit().await.unwrap();

    w.indexer
        .set_results(vec![fixtures::release("stale", "https://dl/stale")])
        .await;
    gate.notify_one();
    stale.await.unwrap().unwrap();

    let snapshot = w.controller.snapshot().await;
    assert_eq!(snapshot.releases.len(), 1);
    assert_eq!(snapshot.releases[0].title, "fresh");
}
