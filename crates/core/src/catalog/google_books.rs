//! Google Books volumes API client.
//!
//! No API key is required for plain volume searches, but one can be supplied
//! to raise quota limits.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::request::CancelSignal;

use super::types::{BookResult, CatalogQuery};
use super::{CatalogError, CatalogSearcher};

/// Default volumes search endpoint.
pub const DEFAULT_VOLUMES_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

const DEFAULT_MAX_RESULTS: u32 = 20;

/// Google Books client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleBooksConfig {
    /// Volumes endpoint (default: the public Google Books API).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Optional API key for higher quota.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Google Books API client.
pub struct GoogleBooksClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    /// Create a new Google Books client.
    pub fn new(config: GoogleBooksConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| CatalogError::ConnectionFailed(e.to_string()))?;

        let endpoint = config
            .endpoint
            .unwrap_or_else(|| DEFAULT_VOLUMES_ENDPOINT.to_string());

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
        })
    }

    /// Build the volumes API URL for a search.
    fn build_search_url(&self, query: &CatalogQuery) -> String {
        let mut url = format!(
            "{}?q={}&maxResults={}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&query.text),
            query.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
        );

        if let Some(lang) = &query.lang_restrict {
            url.push_str(&format!("&langRestrict={}", urlencoding::encode(lang)));
        }
        if let Some(key) = &self.api_key {
            url.push_str(&format!("&key={}", urlencoding::encode(key)));
        }

        url
    }
}

#[async_trait::async_trait]
impl CatalogSearcher for GoogleBooksClient {
    fn name(&self) -> &str {
        "google_books"
    }

    async fn search(
        &self,
        query: &CatalogQuery,
        cancel: CancelSignal,
    ) -> Result<Vec<BookResult>, CatalogError> {
        let url = self.build_search_url(query);
        debug!(query = %query.text, "Catalog search");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout
            } else if e.is_connect() {
                CatalogError::ConnectionFailed(e.to_string())
            } else {
                CatalogError::ApiError {
                    status: 0,
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let volumes: VolumesResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        // The envelope has already decided to discard this response if a
        // newer search superseded us; bail before the mapping work.
        if cancel.is_canceled() {
            return Ok(vec![]);
        }

        let books = normalize_volumes(volumes);
        debug!(results = books.len(), "Catalog search complete");
        Ok(books)
    }
}

/// Map the volumes API response into normalized book records.
pub fn normalize_volumes(response: VolumesResponse) -> Vec<BookResult> {
    response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|volume| {
            let info = volume.volume_info;
            BookResult {
                id: volume.id,
                title: info.title.unwrap_or_default(),
                authors: info.authors.unwrap_or_default(),
                description: info.description,
                published_date: info.published_date,
                page_count: info.page_count,
                categories: info.categories.unwrap_or_default(),
                language: info.language,
                thumbnail_url: info.image_links.and_then(pick_thumbnail),
                isbn: pick_isbn(info.industry_identifiers.unwrap_or_default()),
            }
        })
        .collect()
}

/// Prefer the full thumbnail over the small one, forcing https.
fn pick_thumbnail(links: ImageLinks) -> Option<String> {
    links
        .thumbnail
        .or(links.small_thumbnail)
        .map(|url| match url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => url,
        })
}

/// Prefer the 13-digit ISBN over the 10-digit form when both are present.
fn pick_isbn(identifiers: Vec<IndustryIdentifier>) -> Option<String> {
    let mut isbn_10 = None;
    for id in identifiers {
        match id.kind.as_str() {
            "ISBN_13" => return Some(id.identifier),
            "ISBN_10" => isbn_10 = Some(id.identifier),
            _ => {}
        }
    }
    isbn_10
}

// ============================================================================
// Volumes API response types
// ============================================================================

/// Raw volumes search response.
#[derive(Debug, Default, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

/// A single raw volume.
#[derive(Debug, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(rename = "volumeInfo", default)]
    pub volume_info: VolumeInfo,
}

/// Nested volume metadata.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub categories: Option<Vec<String>>,
    pub language: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}
