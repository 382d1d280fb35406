use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{self, BatchOutcome, LocationResult};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/extract ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ExtractQuery {
    pub label: Option<String>,
}

pub async fn extract_label(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExtractQuery>,
) -> Result<Json<LocationResult>, ApiError> {
    let label = params.label.as_deref().unwrap_or("").trim();
    if label.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'label' parameter"));
    }

    let result = location::extract(label, &state.gazetteer);
    tracing::info!(label, confidence = %result.confidence, "GET /api/extract");
    Ok(Json(result))
}

// ─── POST /api/evaluate ──────────────────────────────────────────

pub async fn evaluate_batch(
    State(state): State<Arc<AppState>>,
    Json(values): Json<Vec<serde_json::Value>>,
) -> Result<Json<BatchOutcome>, ApiError> {
    let start = Instant::now();

    let outcome = state
        .evaluator
        .evaluate_values(&values, &state.gazetteer)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!(
        total = outcome.metrics.total,
        decision = outcome.decision,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/evaluate"
    );
    Ok(Json(outcome))
}

// ─── GET /api/gazetteer ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GazetteerSummary {
    pub districts: usize,
    pub neighborhoods: usize,
}

pub async fn gazetteer_summary(State(state): State<Arc<AppState>>) -> Json<GazetteerSummary> {
    Json(GazetteerSummary {
        districts: state.gazetteer.district_count(),
        neighborhoods: state.gazetteer.neighborhood_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{BatchEvaluator, Confidence, Gazetteer};
    use serde_json::json;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            gazetteer: Gazetteer::build([("강남구", "역삼동"), ("강남구", "대치동")]),
            evaluator: BatchEvaluator::default(),
        })
    }

    #[tokio::test]
    async fn test_extract_endpoint() {
        let query = ExtractQuery { label: Some("강남구 역삼동 위험도평가".into()) };
        let Json(result) = extract_label(State(state()), Query(query)).await.unwrap();
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.neighborhood.as_deref(), Some("역삼동"));
    }

    #[tokio::test]
    async fn test_extract_missing_label_is_bad_request() {
        let query = ExtractQuery { label: Some("   ".into()) };
        let err = extract_label(State(state()), Query(query)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_evaluate_endpoint() {
        let body = vec![json!("강남구 역삼동"), json!("강남구 개포동"), json!("설치공사")];
        let Json(outcome) = evaluate_batch(State(state()), Json(body)).await.unwrap();
        assert_eq!(outcome.metrics.total, 3);
        assert_eq!(outcome.metrics.confidence.high, 1);
        assert_eq!(outcome.metrics.confidence.medium, 1);
        assert!(!outcome.decision);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_non_string() {
        let body = vec![json!("강남구 역삼동"), json!(42)];
        let err = evaluate_batch(State(state()), Json(body)).await.unwrap_err();
        assert_eq!(err.1, "Invalid label at index 1: expected a string, found number");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_gazetteer_summary() {
        let Json(summary) = gazetteer_summary(State(state())).await;
        assert_eq!(summary.districts, 1);
        assert_eq!(summary.neighborhoods, 2);
    }
}
