use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use early_risk::error::AppError;
use early_risk::ingest::{read_records, IngestError};
use early_risk::scoring::{RawRecord, RawValue, ScoredRecord};
use early_risk::{BatchOutcome, TierSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) records: Vec<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) count: usize,
    pub(crate) summary: TierSummary,
    pub(crate) rows: Vec<ScoredRecord>,
}

impl From<BatchOutcome> for ScoreResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            count: outcome.len(),
            summary: outcome.summary,
            rows: outcome.records,
        }
    }
}

pub(crate) fn risk_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/risk/upload", post(upload_endpoint))
        .route("/api/v1/risk/score", post(score_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores a raw CSV upload sent as the request body.
pub(crate) async fn upload_endpoint(
    Extension(state): Extension<AppState>,
    body: String,
) -> Result<Json<ScoreResponse>, AppError> {
    if body.trim().is_empty() {
        return Err(IngestError::EmptyUpload.into());
    }

    let records = read_records(body.as_bytes())?;
    let outcome = state.engine.score_batch(&records);
    info!(
        records = outcome.len(),
        columns = outcome.columns.len(),
        "scored csv upload"
    );

    Ok(Json(outcome.into()))
}

/// Scores records posted as JSON objects keyed by column name. Null cells read
/// as missing; booleans, arrays and objects are kept as text and so fall back to
/// the column default instead of rejecting the batch.
pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    let records: Vec<RawRecord> = payload
        .records
        .into_iter()
        .map(|row| {
            row.into_iter()
                .filter_map(|(name, value)| RawValue::from_json(value).map(|value| (name, value)))
                .collect()
        })
        .collect();

    let outcome = state.engine.score_batch(&records);
    info!(records = outcome.len(), "scored json records");

    Json(outcome.into())
}
