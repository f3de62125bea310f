//! HTTP API surface.

mod activity;
mod downloads;
mod handlers;
mod middleware;
mod notifications;
mod progress;
mod routes;
mod sessions;

pub use routes::create_router;

use axum::Json;
use serde::Serialize;

/// Uniform error body for API failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn json(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: message.into(),
        })
    }
}
