use super::state::AppState;
use crate::session::CallStats;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CallListResponse {
    pub count: usize,
    pub calls: Vec<CallStats>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /calls
/// List active calls
pub async fn list_calls(State(state): State<AppState>) -> impl IntoResponse {
    let calls = state.calls.list().await;

    Json(CallListResponse {
        count: calls.len(),
        calls,
    })
}

/// GET /calls/:call_id
/// Status of one active call
pub async fn get_call_status(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    match state.calls.get(&call_id).await {
        Some(stats) => (StatusCode::OK, Json(stats)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Call {} not found", call_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
