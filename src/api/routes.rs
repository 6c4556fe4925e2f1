use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::evaluator::{ConditionEvaluator, EvaluatorError};

use super::response::{ErrorResponse, HealthResponse, TransactionResponse};

/// Shared application state.
pub struct AppState {
    /// Condition evaluator
    pub evaluator: Arc<ConditionEvaluator>,

    /// Application start time
    pub start_time: Instant,

    /// Application version
    pub version: String,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/transaction", post(handle_transaction))
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Evaluate an inbound transaction message.
///
/// The evaluation runs on its own task so a client disconnect cannot cut it
/// short. The interdiction alert, if any, keeps running after the response.
async fn handle_transaction(
    State(state): State<Arc<AppState>>,
    Json(message): Json<Value>,
) -> Response {
    let evaluator = Arc::clone(&state.evaluator);
    let evaluation = tokio::spawn(async move { evaluator.handle_transaction(message).await });

    let result = match evaluation.await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Evaluation task failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string(), "INTERNAL")),
            )
                .into_response();
        }
    };

    match result {
        Ok(evaluation) => (
            StatusCode::OK,
            Json(TransactionResponse {
                interdicted: evaluation.alert.is_some(),
                rule_result: evaluation.rule_result,
            }),
        )
            .into_response(),
        Err(e @ (EvaluatorError::MalformedMessage(_) | EvaluatorError::InvalidTimestamp(_))) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::unavailable(e.to_string())),
        )
            .into_response(),
    }
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        rule_id: state.evaluator.config().rule_id(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Metrics endpoint (Prometheus format).
async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        state.evaluator.metrics().to_prometheus(),
    )
}
