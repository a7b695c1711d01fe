pub mod drivers;
pub mod orders;
pub mod queues;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(orders::router())
        .merge(drivers::router())
        .merge(queues::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Inclusive creation-date window; both bounds or neither.
pub(crate) fn parse_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<(NaiveDate, NaiveDate)>, AppError> {
    match (start, end) {
        (Some(start), Some(end)) if start <= end => Ok(Some((start, end))),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "start_date must not be after end_date".to_string(),
        )),
        (None, None) => Ok(None),
        _ => Err(AppError::Validation(
            "start_date and end_date must be given together".to_string(),
        )),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    drivers: usize,
    orders: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        drivers: state.drivers.len(),
        orders: state.orders.len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
