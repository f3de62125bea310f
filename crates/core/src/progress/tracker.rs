//! Typed view over the progress store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::achievements::{check_achievements, Achievement, UserProgress};
use super::evolution::EvolutionStage;
use super::store::{keys, ProgressError, ProgressStore};

/// Maximum entries kept in the recent-search history.
const RECENT_SEARCHES_CAP: usize = 10;

/// A recorded search query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentSearch {
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// Persisted counter snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressCounters {
    pub search_count: u64,
    pub download_count: u64,
}

/// Library statistics owned by the backend, supplied per evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LibraryStats {
    #[serde(default)]
    pub total_books: u64,
    #[serde(default)]
    pub monitored_books: u64,
}

/// An evolution-stage change detected during evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvolutionTransition {
    pub from: EvolutionStage,
    pub to: EvolutionStage,
}

/// Result of a progress evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub counters: ProgressCounters,
    pub stage: EvolutionStage,
    pub newly_unlocked: Vec<&'static Achievement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution: Option<EvolutionTransition>,
}

/// Typed wrapper around a [`ProgressStore`]. Cheap to clone.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn ProgressStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Record an explicit user search: bump the counter and prepend the
    /// query to the bounded recent-search history.
    pub fn record_search(&self, query: &str) -> Result<u64, ProgressError> {
        let count = self.store.increment(keys::SEARCH_COUNT)?;

        let mut recent = self.recent_searches()?;
        recent.retain(|s| s.query != query);
        recent.insert(
            0,
            RecentSearch {
                query: query.to_string(),
                timestamp: Utc::now(),
            },
        );
        recent.truncate(RECENT_SEARCHES_CAP);

        let json = serde_json::to_string(&recent)
            .map_err(|e| ProgressError::Serialization(e.to_string()))?;
        self.store.set(keys::RECENT_SEARCHES, &json)?;

        Ok(count)
    }

    /// Record a download submission attempt.
    ///
    /// Counted optimistically, before the submission resolves: the counter
    /// tracks attempts, not confirmed successes.
    pub fn record_download(&self) -> Result<u64, ProgressError> {
        self.store.increment(keys::DOWNLOAD_COUNT)
    }

    /// Current counter values. Malformed stored values read as zero.
    pub fn counters(&self) -> Result<ProgressCounters, ProgressError> {
        Ok(ProgressCounters {
            search_count: self.read_counter(keys::SEARCH_COUNT)?,
            download_count: self.read_counter(keys::DOWNLOAD_COUNT)?,
        })
    }

    /// Recent distinct search queries, newest first.
    pub fn recent_searches(&self) -> Result<Vec<RecentSearch>, ProgressError> {
        let Some(json) = self.store.get(keys::RECENT_SEARCHES)? else {
            return Ok(vec![]);
        };
        match serde_json::from_str(&json) {
            Ok(recent) => Ok(recent),
            Err(e) => {
                // A corrupt history is not worth failing a search over.
                warn!("Discarding malformed recent-search history: {}", e);
                Ok(vec![])
            }
        }
    }

    /// Achievement IDs unlocked so far.
    pub fn unlocked(&self) -> Result<Vec<String>, ProgressError> {
        let Some(json) = self.store.get(keys::ACHIEVEMENTS)? else {
            return Ok(vec![]);
        };
        Ok(serde_json::from_str(&json).unwrap_or_default())
    }

    /// Persisted evolution stage.
    pub fn stage(&self) -> Result<EvolutionStage, ProgressError> {
        Ok(self
            .store
            .get(keys::LAST_STAGE)?
            .map(|v| EvolutionStage::parse(&v))
            .unwrap_or(EvolutionStage::Grub))
    }

    /// Evaluate achievements and evolution against the given library stats,
    /// persisting newly unlocked achievements and any stage advance.
    pub fn evaluate(&self, library: LibraryStats) -> Result<ProgressReport, ProgressError> {
        let counters = self.counters()?;
        let unlocked = self.unlocked()?;

        let progress = UserProgress {
            total_books: library.total_books,
            total_searches: counters.search_count,
            total_downloads: counters.download_count,
            monitored_books: library.monitored_books,
            downloads_last_hour: 0,
            unlocked_achievements: unlocked.clone(),
        };

        let newly_unlocked = check_achievements(&progress);
        if !newly_unlocked.is_empty() {
            let mut all = unlocked;
            all.extend(newly_unlocked.iter().map(|a| a.id.to_string()));
            let json = serde_json::to_string(&all)
                .map_err(|e| ProgressError::Serialization(e.to_string()))?;
            self.store.set(keys::ACHIEVEMENTS, &json)?;
        }

        let previous_stage = self.stage()?;
        let current_stage = EvolutionStage::for_books(library.total_books);
        let evolution = if current_stage != previous_stage {
            self.store.set(keys::LAST_STAGE, current_stage.as_str())?;
            Some(EvolutionTransition {
                from: previous_stage,
                to: current_stage,
            })
        } else {
            None
        };

        Ok(ProgressReport {
            counters,
            stage: current_stage,
            newly_unlocked,
            evolution,
        })
    }

    fn read_counter(&self, key: &str) -> Result<u64, ProgressError> {
        Ok(self
            .store
            .get(key)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }
}
