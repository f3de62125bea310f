use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{activity, downloads, handlers, notifications, progress, sessions};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Search sessions
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}", get(sessions::get_session))
        .route("/sessions/{id}", delete(sessions::delete_session))
        .route("/sessions/{id}/query", post(sessions::set_query))
        .route("/sessions/{id}/mode", post(sessions::set_mode))
        .route("/sessions/{id}/submit", post(sessions::submit))
        .route("/sessions/{id}/find-downloads", post(sessions::find_downloads))
        .route("/sessions/{id}/cancel", post(sessions::cancel))
        // Downloads
        .route("/downloads", post(downloads::submit_download))
        .route("/downloads/in-flight", get(downloads::in_flight))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/{id}",
            delete(notifications::dismiss_notification),
        )
        // Progress and achievements
        .route("/progress", get(progress::get_progress))
        .route("/progress/achievements", get(progress::list_achievements))
        .route("/progress/evaluate", post(progress::evaluate))
        .route("/progress/recent-searches", get(progress::recent_searches))
        // Activity feed
        .route("/activity", get(activity::query_activity));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(super::middleware::track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
