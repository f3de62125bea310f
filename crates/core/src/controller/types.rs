//! Types for the search controller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::BookResult;
use crate::indexer::ReleaseResult;

/// Which backend a raw text query is sent to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Book metadata catalog; results can then be turned into indexer
    /// queries via "find downloads".
    Catalog,
    /// Download indexers, queried with the raw text directly.
    #[default]
    Direct,
}

/// Errors surfaced by controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Query must be at least {min} characters")]
    QueryTooShort { min: usize },

    #[error("Unknown catalog result: {0}")]
    UnknownBook(String),
}

/// A point-in-time copy of the controller state, for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSnapshot {
    pub mode: SearchMode,
    /// The live (undebounced) query.
    pub query: String,
    /// Non-empty query below the minimum search length; the UI hints at the
    /// minimum instead of silently doing nothing.
    pub below_min_length: bool,
    pub books: Vec<BookResult>,
    pub releases: Vec<ReleaseResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_book: Option<BookResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub catalog_searching: bool,
    pub indexer_searching: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&SearchMode::Catalog).unwrap(),
            "\"catalog\""
        );
        assert_eq!(
            serde_json::to_string(&SearchMode::Direct).unwrap(),
            "\"direct\""
        );
        let parsed: SearchMode = serde_json::from_str("\"catalog\"").unwrap();
        assert_eq!(parsed, SearchMode::Catalog);
    }

    #[test]
    fn test_default_mode_is_direct() {
        assert_eq!(SearchMode::default(), SearchMode::Direct);
    }
}
