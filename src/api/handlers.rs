use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::{exposition, MetricStore};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<MetricStore>,
}

// ============================================================================
// Metrics
// ============================================================================

/// Serves whatever snapshot is current. Fetch failures never surface here;
/// they only show up in the scrape error counter.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = exposition::render(&state.store).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        body,
    )
        .into_response())
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub scrape_errors: u64,
    pub series: usize,
    pub last_success: Option<String>,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        scrape_errors: state.store.current_scrape_errors(),
        series: state.store.snapshot().len(),
        last_success: state.store.last_success().map(|t| t.to_rfc3339()),
    })
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        tracing::error!(error = %message, "Request failed");

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
