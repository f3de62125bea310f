//! Types for the metadata catalog search system.

use serde::{Deserialize, Serialize};

/// Query parameters for a catalog search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search query (title, author, ISBN).
    pub text: String,
    /// Optional: restrict results to a language code (e.g. "en").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_restrict: Option<String>,
    /// Maximum results to return (default: 20).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl CatalogQuery {
    /// Create a plain text query with defaults.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang_restrict: None,
            max_results: None,
        }
    }
}

/// A normalized book record from the metadata catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookResult {
    /// Catalog volume ID.
    pub id: String,
    /// Book title.
    pub title: String,
    /// Author names (empty when the catalog omits them).
    #[serde(default)]
    pub authors: Vec<String>,
    /// Description/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publication date (YYYY or YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    /// Page count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    /// Subject categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Cover thumbnail URL (https).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Preferred ISBN (13-digit form when both are present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl BookResult {
    /// First credited author, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Query text used to look for downloadable releases of this book:
    /// `"{title} {first_author}"`, or the title alone when authorless.
    pub fn release_query(&self) -> String {
        match self.first_author() {
            Some(author) => format!("{} {}", self.title, author),
            None => self.title.clone(),
        }
    }
}
