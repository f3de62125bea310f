//! Download submission API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use evolibrary_core::{DownloadError, MediaCategory, ReleaseResult};
use serde::{Deserialize, Serialize};

use crate::metrics::DOWNLOAD_SUBMISSIONS_TOTAL;
use crate::state::AppState;

use super::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct DownloadSubmissionRequest {
    /// The release row as rendered on the search page.
    #[serde(flatten)]
    pub release: ReleaseResult,
    /// User-chosen category; inferred from the release when omitted.
    #[serde(default)]
    pub media_category: Option<MediaCategory>,
}

#[derive(Debug, Serialize)]
pub struct DownloadSubmissionResponse {
    pub status: &'static str,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct InFlightResponse {
    pub in_flight: Vec<String>,
}

/// POST /api/v1/downloads
pub async fn submit_download(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DownloadSubmissionRequest>,
) -> Result<Json<DownloadSubmissionResponse>, (StatusCode, Json<ErrorResponse>)> {
    let category = body
        .media_category
        .unwrap_or_else(|| body.release.media_category());

    let result = state.downloads().submit(&body.release, category).await;

    let outcome = if result.is_ok() { "success" } else { "error" };
    DOWNLOAD_SUBMISSIONS_TOTAL
        .with_label_values(&[outcome])
        .inc();

    match result {
        Ok(()) => Ok(Json(DownloadSubmissionResponse {
            status: "submitted",
            title: body.release.title,
        })),
        Err(e) => {
            let status = match &e {
                DownloadError::MissingDownloadUrl => StatusCode::BAD_REQUEST,
                DownloadError::AlreadyInFlight => StatusCode::CONFLICT,
                DownloadError::Rejected(_) => StatusCode::BAD_GATEWAY,
                DownloadError::ConnectionFailed(_) | DownloadError::Timeout => {
                    StatusCode::BAD_GATEWAY
                }
                DownloadError::ApiError(_) | DownloadError::Progress(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            Err((status, ErrorResponse::json(e.to_string())))
        }
    }
}

/// GET /api/v1/downloads/in-flight
pub async fn in_flight(State(state): State<Arc<AppState>>) -> Json<InFlightResponse> {
    Json(InFlightResponse {
        in_flight: state.downloads().in_flight(),
    })
}
