use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evolibrary_core::{
    create_audit_system, load_config, validate_config, AggregatorConfig, AggregatorSearcher,
    AuditEvent, AuditStore, CatalogSearcher, DownloadClient, DownloadCoordinator,
    GoogleBooksClient, HttpDownloadClient, HttpDownloadConfig, Notifier, ProgressStore,
    ProgressTracker, ReleaseSearcher, SearchController, SqliteAuditStore, SqliteProgressStore,
};

use evolibrary_server::api::create_router;
use evolibrary_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for audit event channel
const AUDIT_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("EVOLIBRARY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; a missing file means defaults.
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No config file at {:?}, using defaults", config_path);
        evolibrary_core::Config::default()
    };

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Backend API base: {}", config.backend.api_base());

    // Compute config hash for audit
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    let config_hash_short = &config_hash[..16];

    // Create SQLite audit store
    let audit_store: Arc<dyn AuditStore> = Arc::new(
        SqliteAuditStore::new(&config.database.path).context("Failed to create audit store")?,
    );
    info!("Audit store initialized");

    // Create SQLite progress store
    let progress_store: Arc<dyn ProgressStore> = Arc::new(
        SqliteProgressStore::new(&config.database.path)
            .context("Failed to create progress store")?,
    );
    let tracker = ProgressTracker::new(progress_store);
    info!("Progress store initialized");

    // Create audit system
    let (audit_handle, audit_writer) =
        create_audit_system(Arc::clone(&audit_store), AUDIT_BUFFER_SIZE);

    // Spawn audit writer task
    let writer_handle = tokio::spawn(audit_writer.run());

    audit_handle
        .emit(AuditEvent::ServiceStarted {
            version: VERSION.to_string(),
            config_hash: config_hash_short.to_string(),
        })
        .await;

    // Upstream clients
    let catalog: Arc<dyn CatalogSearcher> = Arc::new(
        GoogleBooksClient::new(config.catalog.clone())
            .context("Failed to create catalog client")?,
    );
    let indexer: Arc<dyn ReleaseSearcher> = Arc::new(
        AggregatorSearcher::new(AggregatorConfig {
            api_base: config.backend.api_base(),
            timeout_secs: config.backend.timeout_secs,
        })
        .context("Failed to create indexer searcher")?,
    );
    let download_client: Arc<dyn DownloadClient> = Arc::new(
        HttpDownloadClient::new(HttpDownloadConfig {
            api_base: config.backend.api_base(),
            timeout_secs: config.backend.timeout_secs,
        })
        .context("Failed to create download client")?,
    );
    info!("Upstream clients initialized");

    let notifier = Notifier::default();

    // Download coordinator shared by all sessions
    let downloads = DownloadCoordinator::new(
        download_client,
        tracker.clone(),
        notifier.clone(),
        Some(audit_handle.clone()),
    );

    // Factory for per-session search controllers
    let make_controller: Box<dyn Fn() -> SearchController + Send + Sync> = {
        let search_config = config.search.clone();
        let tracker = tracker.clone();
        let notifier = notifier.clone();
        let audit_handle = audit_handle.clone();
        Box::new(move || {
            SearchController::new(
                search_config.clone(),
                Arc::clone(&catalog),
                Arc::clone(&indexer),
                tracker.clone(),
                notifier.clone(),
            )
            .with_audit(audit_handle.clone())
        })
    };

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        downloads,
        tracker,
        notifier,
        audit_handle.clone(),
        audit_store,
        make_controller,
    ));

    // Create router
    let app = create_router(Arc::clone(&state));

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Tear down sessions so no request outlives the server
    info!("Server shutting down...");
    state.stop_all_sessions().await;

    audit_handle
        .emit(AuditEvent::ServiceStopped {
            reason: "graceful_shutdown".to_string(),
        })
        .await;

    // Drop all holders of AuditHandle so the writer's channel closes.
    // The state holds a clone, so it must go before the final handle.
    drop(state);
    drop(audit_handle);

    // Wait for writer to finish processing remaining events
    let _ = writer_handle.await;
    info!("Audit writer stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
