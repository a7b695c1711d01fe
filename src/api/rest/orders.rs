use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::lifecycle::{self, NewOrder};
use crate::error::AppError;
use crate::models::order::{Order, Service};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/accept", post(accept_order))
        .route("/orders/:id/transfer", post(transfer_order))
        .route("/orders/:id/complete", post(complete_order))
}

#[derive(Deserialize)]
struct ListOrdersQuery {
    service: Option<Service>,
}

#[derive(Deserialize)]
struct AcceptRequest {
    driver_id: Uuid,
}

#[derive(Deserialize)]
struct TransferRequest {
    driver_id: Uuid,
    new_driver_phone: String,
}

#[derive(Deserialize)]
struct CompleteRequest {
    driver_id: Uuid,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<Order>, AppError> {
    let order = lifecycle::create_order(&state, payload)?;
    Ok(Json(order))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Json<Vec<Order>> {
    Json(state.orders.list(query.service))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order))
}

async fn accept_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AcceptRequest>,
) -> Result<Json<Order>, AppError> {
    let order = lifecycle::accept_order(&state, id, payload.driver_id)?;
    Ok(Json(order))
}

async fn transfer_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransferRequest>,
) -> Result<Json<Order>, AppError> {
    let order = lifecycle::transfer_order(&state, id, payload.driver_id, &payload.new_driver_phone)?;
    Ok(Json(order))
}

async fn complete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<Order>, AppError> {
    let order = lifecycle::complete_order(&state, id, payload.driver_id)?;
    Ok(Json(order))
}
