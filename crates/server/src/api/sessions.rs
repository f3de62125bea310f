//! Search session API handlers.
//!
//! A session owns one `SearchController`; the browser drives it with query
//! keystrokes, mode toggles, explicit submissions, and catalog selections,
//! and polls the snapshot for rendering.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use evolibrary_core::{ControllerError, SearchController, SearchMode, SearchSnapshot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::SEARCHES_TOTAL;
use crate::state::AppState;

use super::ErrorResponse;

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: SearchMode,
}

#[derive(Debug, Deserialize)]
pub struct FindDownloadsRequest {
    pub book_id: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

async fn lookup(state: &AppState, id: &Uuid) -> Result<SearchController, ApiError> {
    state.session(id).await.ok_or((
        StatusCode::NOT_FOUND,
        ErrorResponse::json(format!("No such session: {}", id)),
    ))
}

fn controller_error(e: ControllerError) -> ApiError {
    let status = match e {
        ControllerError::UnknownBook(_) => StatusCode::NOT_FOUND,
        ControllerError::EmptyQuery | ControllerError::QueryTooShort { .. } => {
            StatusCode::BAD_REQUEST
        }
    };
    (status, ErrorResponse::json(e.to_string()))
}

/// POST /api/v1/sessions
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let id = state.create_session().await;
    (StatusCode::CREATED, Json(SessionCreatedResponse { id }))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SearchSnapshot>, ApiError> {
    let controller = lookup(&state, &id).await?;
    Ok(Json(controller.snapshot().await))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            ErrorResponse::json(format!("No such session: {}", id)),
        ))
    }
}

/// POST /api/v1/sessions/{id}/query
///
/// Keystroke-level query input; searches fire only after the debounce
/// settles.
pub async fn set_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<SearchSnapshot>, ApiError> {
    let controller = lookup(&state, &id).await?;
    controller.type_query(&body.query).await;
    Ok(Json(controller.snapshot().await))
}

/// POST /api/v1/sessions/{id}/mode
pub async fn set_mode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ModeRequest>,
) -> Result<Json<SearchSnapshot>, ApiError> {
    let controller = lookup(&state, &id).await?;
    controller.set_mode(body.mode).await;
    Ok(Json(controller.snapshot().await))
}

/// POST /api/v1/sessions/{id}/submit
///
/// Explicit search submission; resolves once the search completes.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SearchSnapshot>, ApiError> {
    let controller = lookup(&state, &id).await?;
    controller.submit().await.map_err(controller_error)?;

    let snapshot = controller.snapshot().await;
    let mode = match snapshot.mode {
        SearchMode::Catalog => "catalog",
        SearchMode::Direct => "direct",
    };
    SEARCHES_TOTAL.with_label_values(&[mode]).inc();

    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/{id}/find-downloads
pub async fn find_downloads(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<FindDownloadsRequest>,
) -> Result<Json<SearchSnapshot>, ApiError> {
    let controller = lookup(&state, &id).await?;
    controller
        .find_downloads(&body.book_id)
        .await
        .map_err(controller_error)?;
    Ok(Json(controller.snapshot().await))
}

/// POST /api/v1/sessions/{id}/cancel
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SearchSnapshot>, ApiError> {
    let controller = lookup(&state, &id).await?;
    controller.cancel().await;
    Ok(Json(controller.snapshot().await))
}
