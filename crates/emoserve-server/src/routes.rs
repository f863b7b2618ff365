//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/analyze", post(analyze))
        .fallback(fallback)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Analyze request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Text to classify
    pub text: String,
}

/// Analyze response: the model's top-ranked label and its score
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub emotion: String,
    pub confidence: f32,
}

/// Main analysis handler.
///
/// Takes the highest-ranked prediction from the classifier and returns it as
/// `{emotion, confidence}`. Body validation failures become 400s instead of
/// unhandled faults; the classifier error kind maps to 500.
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    metrics::counter!("emoserve_requests_total").increment(1);

    let Json(req) = payload?;
    debug!(chars = req.text.chars().count(), "received analyze request");

    let start = Instant::now();
    let ranking = state.classifier.classify(&req.text).await?;
    metrics::histogram!("emoserve_inference_latency_us")
        .record(start.elapsed().as_micros() as f64);

    let top = ranking
        .top()
        .ok_or_else(|| AppError::Internal("classifier returned no predictions".to_string()))?;

    info!(
        emotion = top.label.as_str(),
        confidence = top.score as f64,
        "analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        emotion: top.label.clone(),
        confidence: top.score,
    }))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Classifier(String),
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<emoserve_core::Error> for AppError {
    fn from(err: emoserve_core::Error) -> Self {
        match err {
            emoserve_core::Error::Classifier(msg) => AppError::Classifier(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", msg)
            }
            AppError::Classifier(msg) => {
                warn!("classifier failure: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "classifier_error", msg)
            }
            AppError::Internal(msg) => {
                warn!("internal failure: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        metrics::counter!("emoserve_errors_total", "kind" => kind).increment(1);

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
