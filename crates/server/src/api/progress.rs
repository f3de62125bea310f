//! Progress and achievement API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use evolibrary_core::progress::{
    EvolutionStage, LibraryStats, ProgressCounters, ProgressReport, RecentSearch, ACHIEVEMENTS,
};
use evolibrary_core::AuditEvent;
use serde::Serialize;

use crate::state::AppState;

use super::ErrorResponse;

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub counters: ProgressCounters,
    pub stage: EvolutionStage,
    pub unlocked: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecentSearchesResponse {
    pub searches: Vec<RecentSearch>,
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<&'static evolibrary_core::Achievement>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn progress_error(e: evolibrary_core::ProgressError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::json(e.to_string()),
    )
}

/// GET /api/v1/progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let tracker = state.tracker();
    Ok(Json(ProgressResponse {
        counters: tracker.counters().map_err(progress_error)?,
        stage: tracker.stage().map_err(progress_error)?,
        unlocked: tracker.unlocked().map_err(progress_error)?,
    }))
}

/// GET /api/v1/progress/achievements
///
/// The full achievement table, for the achievements page.
pub async fn list_achievements() -> Json<AchievementsResponse> {
    Json(AchievementsResponse {
        achievements: ACHIEVEMENTS.iter().collect(),
    })
}

/// POST /api/v1/progress/evaluate
///
/// Evaluate achievements and evolution against library statistics supplied
/// by the caller (the library backend owns the book counts).
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(library): Json<LibraryStats>,
) -> Result<Json<ProgressReport>, ApiError> {
    let report = state
        .tracker()
        .evaluate(library)
        .map_err(progress_error)?;

    for achievement in &report.newly_unlocked {
        state
            .audit()
            .emit(AuditEvent::AchievementUnlocked {
                achievement_id: achievement.id.to_string(),
            })
            .await;
    }
    if let Some(evolution) = &report.evolution {
        state
            .audit()
            .emit(AuditEvent::EvolutionAdvanced {
                from_stage: evolution.from.as_str().to_string(),
                to_stage: evolution.to.as_str().to_string(),
            })
            .await;
    }

    Ok(Json(report))
}

/// GET /api/v1/progress/recent-searches
pub async fn recent_searches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RecentSearchesResponse>, ApiError> {
    Ok(Json(RecentSearchesResponse {
        searches: state.tracker().recent_searches().map_err(progress_error)?,
    }))
}
