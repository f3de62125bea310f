//! EvoLibrary core: search orchestration for a personal media library.
//!
//! The centerpiece is the [`SearchController`], which debounces typed
//! queries, fans them out to the book metadata catalog or the download
//! indexers depending on the active mode, and commits results only from
//! requests that were not superseded. Around it sit the download
//! [`DownloadCoordinator`], the gamified [`progress`] subsystem, ephemeral
//! [`notify`] toasts, and the [`audit`] activity trail.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod downloader;
pub mod indexer;
pub mod notify;
pub mod progress;
pub mod request;
pub mod testing;

pub use audit::{
    create_audit_system, AuditError, AuditEvent, AuditFilter, AuditHandle, AuditRecord,
    AuditStore, AuditWriter, SqliteAuditStore,
};
pub use catalog::{
    BookResult, CatalogError, CatalogQuery, CatalogSearcher, GoogleBooksClient, GoogleBooksConfig,
};
pub use config::{
    load_config, load_config_from_str, validate_config, BackendConfig, Config, ConfigError,
    SanitizedConfig, SearchConfig, ServerConfig,
};
pub use controller::{ControllerError, SearchController, SearchMode, SearchSnapshot};
pub use downloader::{
    DownloadClient, DownloadCoordinator, DownloadError, DownloadRequest, HttpDownloadClient,
    HttpDownloadConfig,
};
pub use indexer::{
    AggregatorConfig, AggregatorSearcher, IndexerError, MediaCategory, ReleaseResult,
    ReleaseSearcher,
};
pub use notify::{Notification, NotificationKind, Notifier};
pub use progress::{
    Achievement, EvolutionStage, LibraryStats, MemoryProgressStore, ProgressCounters,
    ProgressError, ProgressReport, ProgressStore, ProgressTracker, RecentSearch,
    SqliteProgressStore,
};
pub use request::{CancelSignal, Canceled, RequestEnvelope};
