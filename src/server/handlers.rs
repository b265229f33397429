//! API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::config::CheckParams;
use crate::error_handling::CheckError;

/// JSON body of a failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe.
pub async fn health_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Runs a full check on the URL-decoded email path parameter.
pub async fn check_email_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Response {
    match state.checker.check(CheckParams::new(email)).await {
        Ok(result) => Json(result).into_response(),
        Err(e @ CheckError::InvalidEmail(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid email".to_string(),
                message: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}
