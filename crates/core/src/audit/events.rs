use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Search events
    CatalogSearchExecuted {
        /// The query that was searched
        query: String,
        /// Number of books returned
        results_count: u32,
        /// How long the search took in milliseconds
        duration_ms: u64,
    },
    IndexerSearchExecuted {
        /// The query that was searched
        query: String,
        /// Title of the catalog selection the query was derived from, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        derived_from: Option<String>,
        /// Number of release candidates returned
        results_count: u32,
        /// How long the search took in milliseconds
        duration_ms: u64,
    },
    SearchFailed {
        /// Which backend failed ("catalog" or "indexer")
        source: String,
        /// The query that was searched
        query: String,
        /// Error message
        error: String,
    },

    // Download events
    DownloadSubmitted {
        /// Release title
        title: String,
        /// Media category the user filed it under
        media_type: String,
        /// Indexer the release came from
        indexer_id: i64,
        /// Whether the submission was accepted
        success: bool,
        /// Error message on failure
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    // Progress events
    AchievementUnlocked {
        achievement_id: String,
    },
    EvolutionAdvanced {
        from_stage: String,
        to_stage: String,
    },
}

impl AuditEvent {
    /// Returns the event type as a string for storage
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ServiceStarted { .. } => "service_started",
            Self::ServiceStopped { .. } => "service_stopped",
            Self::CatalogSearchExecuted { .. } => "catalog_search_executed",
            Self::IndexerSearchExecuted { .. } => "indexer_search_executed",
            Self::SearchFailed { .. } => "search_failed",
            Self::DownloadSubmitted { .. } => "download_submitted",
            Self::AchievementUnlocked { .. } => "achievement_unlocked",
            Self::EvolutionAdvanced { .. } => "evolution_advanced",
        }
    }
}

/// A stored audit record with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub data: AuditEvent,
}
