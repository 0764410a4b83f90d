//! REST endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contentsnap::{
    CapabilityRegistry, DetailLevel, FormattedResult, OutputFormat, PipelineConfig, SummaryError,
    SummaryRequest, VERSION, normalize, produce_summary, validate_input,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

pub const TOO_SHORT_DETAIL: &str = "Text too short. Minimum 50 characters required.";
pub const NO_SUMMARY_DETAIL: &str = "Failed to generate summary";
pub const INTERNAL_DETAIL: &str = "Internal server error";
pub const SHUTTING_DOWN_DETAIL: &str = "Server is shutting down";

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CapabilityRegistry>,
    pub pipeline: Arc<PipelineConfig>,
    /// Worker pool permits. Closed on shutdown.
    pub workers: Arc<Semaphore>,
}

/// Error response body: `{"detail": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, detail: &'static str) -> Self {
        Self { status, detail }
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL)
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::InputTooShort { .. } => {
                Self::new(StatusCode::BAD_REQUEST, TOO_SHORT_DETAIL)
            }
            SummaryError::NoContentProduced => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, NO_SUMMARY_DETAIL)
            }
            other => {
                error!(error = %other, "summarization failed");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// POST /summarize: Summarize a document.
///
/// Validates and normalizes the text, picks a capability, then runs the
/// blocking pipeline on a worker. Returns the [`FormattedResult`].
pub async fn summarize(
    State(app): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<FormattedResult>, ApiError> {
    validate_input(&request.text)?;
    let text = normalize(&request.text);
    info!(
        chars = text.chars().count(),
        format = request.format.as_str(),
        detail = %request.detail_level,
        "summarize request"
    );

    let capability = app.registry.select(text.chars().count(), &request.format)?;

    let permit = app.workers.clone().acquire_owned().await.map_err(|_| {
        warn!("worker pool closed, rejecting request");
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, SHUTTING_DOWN_DETAIL)
    })?;

    let pipeline = app.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        produce_summary(&text, &request, capability.as_ref(), &pipeline)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "summary worker panicked");
        ApiError::internal()
    })??;

    Ok(Json(result))
}

/// Response body for GET /health.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub models_loaded: bool,
    pub available_models: Vec<String>,
    pub available_formats: Vec<String>,
    pub detail_levels: Vec<String>,
    pub version: String,
}

/// GET /health: Registered capabilities and supported options.
pub async fn health(State(app): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        models_loaded: !app.registry.is_empty(),
        available_models: app.registry.names(),
        available_formats: OutputFormat::names().iter().map(|s| s.to_string()).collect(),
        detail_levels: DetailLevel::names().iter().map(|s| s.to_string()).collect(),
        version: VERSION.to_string(),
    })
}

/// GET /: Service banner.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": format!("contentsnap API v{VERSION}"),
        "endpoints": {
            "/summarize": "POST - Summarize a document",
            "/health": "GET - Health check",
        },
    }))
}
