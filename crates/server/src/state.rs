use std::collections::HashMap;
use std::sync::Arc;

use evolibrary_core::{
    AuditHandle, AuditStore, Config, DownloadCoordinator, Notifier, ProgressTracker,
    SanitizedConfig, SearchController,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared application state
pub struct AppState {
    config: Config,
    sessions: RwLock<HashMap<Uuid, SearchController>>,
    downloads: DownloadCoordinator,
    tracker: ProgressTracker,
    notifier: Notifier,
    audit: AuditHandle,
    audit_store: Arc<dyn AuditStore>,
    make_controller: Box<dyn Fn() -> SearchController + Send + Sync>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        downloads: DownloadCoordinator,
        tracker: ProgressTracker,
        notifier: Notifier,
        audit: AuditHandle,
        audit_store: Arc<dyn AuditStore>,
        make_controller: Box<dyn Fn() -> SearchController + Send + Sync>,
    ) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
            downloads,
            tracker,
            notifier,
            audit,
            audit_store,
            make_controller,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// Create a new search session and start its controller.
    pub async fn create_session(&self) -> Uuid {
        let controller = (self.make_controller)();
        controller.start();

        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, controller);
        id
    }

    /// Look up a session's controller.
    pub async fn session(&self, id: &Uuid) -> Option<SearchController> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Tear a session down, canceling any in-flight requests.
    pub async fn remove_session(&self, id: &Uuid) -> bool {
        let controller = self.sessions.write().await.remove(id);
        match controller {
            Some(controller) => {
                controller.stop().await;
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Stop every session; used on shutdown.
    pub async fn stop_all_sessions(&self) {
        let controllers: Vec<SearchController> =
            self.sessions.write().await.drain().map(|(_, c)| c).collect();
        for controller in controllers {
            controller.stop().await;
        }
    }

    pub fn downloads(&self) -> &DownloadCoordinator {
        &self.downloads
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn audit(&self) -> &AuditHandle {
        &self.audit
    }

    pub fn audit_store(&self) -> &dyn AuditStore {
        self.audit_store.as_ref()
    }
}
