//! Test doubles for the external collaborators.
//!
//! These mocks implement the searcher and download-client traits with
//! controllable behavior: canned results, recorded calls for assertions,
//! injectable errors, and gates for holding a request in flight while a test
//! exercises cancellation or supersession.

mod mock_catalog;
mod mock_downloader;
mod mock_indexer;

pub use mock_catalog::MockCatalog;
pub use mock_downloader::MockDownloadClient;
pub use mock_indexer::MockIndexer;

/// Canned record constructors shared by tests.
pub mod fixtures {
    use crate::catalog::BookResult;
    use crate::indexer::ReleaseResult;

    /// A catalog book with the given id, title, and authors.
    pub fn book(id: &str, title: &str, authors: &[&str]) -> BookResult {
        BookResult {
            id: id.to_string(),
            title: title.to_string(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            description: Some(format!("About {}", title)),
            published_date: Some("1965-08-01".to_string()),
            page_count: Some(412),
            categories: vec!["Fiction".to_string()],
            language: Some("en".to_string()),
            thumbnail_url: Some(format!("https://covers.example/{}.jpg", id)),
            isbn: Some("9780441013593".to_string()),
        }
    }

    /// A release candidate with the given title and download URL.
    pub fn release(title: &str, download_url: &str) -> ReleaseResult {
        ReleaseResult {
            title: title.to_string(),
            download_url: download_url.to_string(),
            indexer_id: 1,
            indexer_name: "mock-indexer".to_string(),
            size_bytes: 2 * 1024 * 1024,
            size_mb: 2.0,
            seeders: 15,
            protocol: "torrent".to_string(),
            publish_date: None,
            info_url: None,
            categories: vec!["Books/Ebook".to_string()],
            file_format: Some("epub".to_string()),
        }
    }
}
