use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// An accept lost the race: the order left Unaccepted first.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Transfer or complete attempted by a driver who does not hold the order.
    #[error("not assigned: {0}")]
    NotAssigned(String),

    /// Transfer target phone did not resolve to a registered driver.
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// Operation on an order already in its terminal state.
    #[error("order already completed: {0}")]
    AlreadyTerminal(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NotAssigned(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::UnknownDriver(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::AlreadyTerminal(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
