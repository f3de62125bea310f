//! Activity feed API handlers, backed by the audit store.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use evolibrary_core::{AuditFilter, AuditRecord};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

use super::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default)]
    pub event_type: Option<String>,
    /// RFC 3339 lower bound on the event timestamp.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// RFC 3339 upper bound on the event timestamp.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub records: Vec<AuditRecord>,
    pub total: i64,
}

/// GET /api/v1/activity
pub async fn query_activity(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivityQuery>,
) -> Result<Json<ActivityResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut filter = AuditFilter::new()
        .with_limit(params.limit.unwrap_or(100).clamp(1, 1000))
        .with_offset(params.offset.unwrap_or(0).max(0))
        .with_time_range(params.from, params.to);
    if let Some(event_type) = params.event_type {
        filter = filter.with_event_type(event_type);
    }

    let store = state.audit_store();
    let records = store.query(&filter).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::json(e.to_string()),
        )
    })?;
    let total = store.count(&filter).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::json(e.to_string()),
        )
    })?;

    Ok(Json(ActivityResponse { records, total }))
}
