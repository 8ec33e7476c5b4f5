//! API route handlers

use std::net::SocketAddr;
use std::path::Path;

use anomaly::NumericTable;
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::input::{ScoreInput, SERIES_COLUMN};
use crate::state::AppState;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub input_dim: usize,
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub scores: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub values: Option<Vec<f64>>,
    pub scores: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// `api_key` query parameter, accepted by `/analyze` and `/ws`.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub api_key: Option<String>,
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - is a model loaded?
pub async fn readiness(State(state): State<AppState>) -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        input_dim: state.scorer.input_dim(),
    })
}

/// Sorted names of the CSV files in the datasets directory.
pub async fn list_datasets(State(state): State<AppState>) -> Json<DatasetsResponse> {
    Json(DatasetsResponse {
        datasets: csv_file_names(&state.config.datasets_dir).await,
    })
}

async fn csv_file_names(dir: &Path) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "datasets directory unavailable");
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    names
}

/// Per-timestep reconstruction-error scores for an uploaded table.
pub async fn predict(
    State(state): State<AppState>,
    ScoreInput(table): ScoreInput,
) -> Result<Json<ScoresResponse>, ApiError> {
    let scores = score_table(&state, table).await?;
    Ok(Json(ScoresResponse { scores }))
}

/// Rule-based summary of raw values or precomputed scores.
pub async fn analyze(
    State(state): State<AppState>,
    Query(auth): Query<AuthQuery>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if request.values.is_none() && request.scores.is_none() {
        return Err(ApiError::BadRequest("provide values or scores".to_string()));
    }

    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or(auth.api_key);
    if let Some(expected) = &state.config.api_key {
        if presented.as_deref() != Some(expected.as_str()) {
            return Err(ApiError::Unauthorized);
        }
    }

    // Unverified keys never pick the bucket.
    let client = match &state.config.api_key {
        Some(_) => presented,
        None => connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()),
    }
    .unwrap_or_else(|| "anon".to_string());
    if !state.limiter.check(&client) {
        debug!(client = %client, "rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    let scores = match (request.scores, request.values) {
        (Some(scores), _) => scores,
        (None, Some(values)) => {
            let table = NumericTable::from_series(SERIES_COLUMN, &values)?;
            score_table(&state, table).await?
        }
        (None, None) => return Err(ApiError::BadRequest("provide values or scores".to_string())),
    };

    let report = state
        .summarizer
        .summarize_with(&scores, state.enricher.as_deref());
    Ok(Json(AnalyzeResponse {
        analysis: report.summary,
    }))
}

/// Score on the blocking pool; the model is shared read-only.
async fn score_table(state: &AppState, table: NumericTable) -> Result<Vec<f64>, ApiError> {
    let scorer = state.scorer.clone();
    let scores = tokio::task::spawn_blocking(move || scorer.score(&table)).await??;
    Ok(scores)
}
