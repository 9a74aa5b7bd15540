//! HTTP route handlers for the summarizer API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use crate::pipeline::{PipelineError, SummaryReport};
use crate::session::{HistoryEntry, SessionView};

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/session",
            get(get_session).delete(reset_session),
        )
        .route("/api/session/key", post(set_api_key))
        .route("/api/history", get(get_history).delete(clear_history))
        .route("/api/summarize", post(summarize))
        .fallback_service(static_files)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.pipeline.summarizer().model_name(),
    }))
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Message to display.
    pub error: String,
}

/// An error with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let status = match &err {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            PipelineError::NoContent => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Load(load) if !load.is_remote() => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Current session without the credential.
async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.session.read().await.view())
}

/// Drop the credential, the history and cached documents.
async fn reset_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.reset();
    state.pipeline.clear_cache();
    tracing::info!("Session reset");
    Json(session.view())
}

/// API key request.
#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    /// The credential.
    pub api_key: String,
}

/// Store the credential for this session.
async fn set_api_key(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ApiKeyRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    session.set_api_key(&request.api_key).map_err(|e| {
        tracing::debug!("Rejected API key: {}", e.reason());
        ApiError::bad_request(e.to_string())
    })?;
    tracing::info!("API key stored");
    Ok(Json(session.view()))
}

/// History entries, oldest first.
async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryEntry>> {
    Json(state.session.read().await.history().to_vec())
}

/// Drop all history entries.
async fn clear_history(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.clear_history();
    tracing::info!("History cleared");
    Json(session.view())
}

/// Summarize request.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// URL to summarize.
    pub url: String,
}

/// Summarize response.
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    /// Outcome of the submission.
    #[serde(flatten)]
    pub report: SummaryReport,
    /// History after the submission.
    pub history: Vec<HistoryEntry>,
}

/// Run the pipeline for one URL.
async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let report = match state.pipeline.run(&state.session, &request.url).await {
        Ok(report) => report,
        Err(err) => {
            match &err {
                PipelineError::Input(input) => {
                    tracing::debug!("Rejected submission {:?}: {}", request.url, input.reason());
                }
                e if e.is_validation() => tracing::debug!("Rejected submission: {e}"),
                e => tracing::error!("Summarization failed for {}: {e}", request.url),
            }
            return Err(err.into());
        }
    };

    let history = state.session.read().await.history().to_vec();
    Ok(Json(SummarizeResponse { report, history }))
}
