//! Download submission coordination.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::audit::{AuditEvent, AuditHandle};
use crate::indexer::{MediaCategory, ReleaseResult};
use crate::notify::Notifier;
use crate::progress::ProgressTracker;

use super::{DownloadClient, DownloadError, DownloadRequest};

const TITLE_TOAST_LEN: usize = 50;

/// Coordinates download submissions: in-flight tracking, optimistic counter
/// updates, user notifications, and the audit trail.
pub struct DownloadCoordinator {
    client: Arc<dyn DownloadClient>,
    tracker: ProgressTracker,
    notifier: Notifier,
    audit: Option<AuditHandle>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Removes the release key from the in-flight set when dropped, so cleanup
/// happens on success, failure, and task cancellation alike.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().unwrap().remove(&self.key);
    }
}

impl DownloadCoordinator {
    pub fn new(
        client: Arc<dyn DownloadClient>,
        tracker: ProgressTracker,
        notifier: Notifier,
        audit: Option<AuditHandle>,
    ) -> Self {
        Self {
            client,
            tracker,
            notifier,
            audit,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Submit a release to the download client under the given category.
    ///
    /// The persisted download counter is incremented before the network call:
    /// it counts submission attempts, not confirmed successes.
    pub async fn submit(
        &self,
        release: &ReleaseResult,
        category: MediaCategory,
    ) -> Result<(), DownloadError> {
        if release.download_url.is_empty() {
            return Err(DownloadError::MissingDownloadUrl);
        }

        let key = release.download_url.clone();
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if !in_flight.insert(key.clone()) {
                return Err(DownloadError::AlreadyInFlight);
            }
        }
        let _guard = InFlightGuard {
            set: Arc::clone(&self.in_flight),
            key,
        };

        if let Err(e) = self.tracker.record_download() {
            // Counting failures must not block the submission itself.
            warn!("Failed to record download count: {}", e);
        }

        let request = DownloadRequest {
            download_url: release.download_url.clone(),
            title: release.title.clone(),
            media_category: category,
            file_format: release.file_format.clone(),
            indexer_id: release.indexer_id,
        };

        let result = self.client.submit(&request).await;

        let short_title: String = release.title.chars().take(TITLE_TOAST_LEN).collect();
        match &result {
            Ok(()) => {
                self.notifier
                    .success(format!("Sent to download client: {}", short_title));
            }
            Err(e) => {
                self.notifier
                    .error(format!("Download failed for {}: {}", short_title, e));
            }
        }

        if let Some(audit) = &self.audit {
            audit
                .emit(AuditEvent::DownloadSubmitted {
                    title: release.title.clone(),
                    media_type: category.to_string(),
                    indexer_id: release.indexer_id,
                    success: result.is_ok(),
                    error: result.as_ref().err().map(|e| e.to_string()),
                })
                .await;
        }

        result
    }

    /// Whether a submission for this release is currently in flight.
    pub fn is_in_flight(&self, download_url: &str) -> bool {
        self.in_flight.lock().unwrap().contains(download_url)
    }

    /// All in-flight release keys.
    pub fn in_flight(&self) -> Vec<String> {
        self.in_flight.lock().unwrap().iter().cloned().collect()
    }
}
