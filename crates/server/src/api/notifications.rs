//! Toast notification API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use evolibrary_core::Notification;
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;

use super::ErrorResponse;

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// GET /api/v1/notifications
pub async fn list_notifications(State(state): State<Arc<AppState>>) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        notifications: state.notifier().active(),
    })
}

/// DELETE /api/v1/notifications/{id}
pub async fn dismiss_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    if state.notifier().dismiss(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            ErrorResponse::json(format!("No such notification: {}", id)),
        ))
    }
}
