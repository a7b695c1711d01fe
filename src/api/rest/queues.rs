use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::parse_date_range;
use crate::engine::matcher::{matching_orders, MatchMode};
use crate::engine::queue::{
    accepted_queue, completed_queue, paginate, unaccepted_queue, Page, UnacceptedSort,
};
use crate::error::AppError;
use crate::models::order::{Order, Service};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/queues/unaccepted", get(unaccepted))
        .route("/queues/accepted", get(accepted))
        .route("/queues/completed", get(completed))
        .route("/queues/matched", get(matched))
}

fn default_page() -> usize {
    1
}

#[derive(Deserialize)]
struct UnacceptedQuery {
    service: Option<Service>,
    sort: Option<UnacceptedSort>,
    #[serde(default = "default_page")]
    page: usize,
}

#[derive(Deserialize)]
struct DriverQueueQuery {
    driver_id: Uuid,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(default = "default_page")]
    page: usize,
}

#[derive(Deserialize)]
struct CompletedQueueQuery {
    driver_id: Uuid,
    #[serde(default = "default_page")]
    page: usize,
}

#[derive(Deserialize)]
struct MatchedQuery {
    driver_id: Uuid,
    slot_id: Uuid,
    mode: Option<MatchMode>,
}

async fn unaccepted(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UnacceptedQuery>,
) -> Json<Page<Order>> {
    let sort = query.sort.unwrap_or(UnacceptedSort::Urgency);
    let queue = unaccepted_queue(state.orders.list(query.service), sort);

    Json(paginate(queue, query.page, state.page_size))
}

async fn accepted(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DriverQueueQuery>,
) -> Result<Json<Page<Order>>, AppError> {
    if state.drivers.get(query.driver_id).is_none() {
        return Err(AppError::NotFound(format!(
            "driver {} not found",
            query.driver_id
        )));
    }

    let range = parse_date_range(query.start_date, query.end_date)?;
    let queue = accepted_queue(
        state.orders.list_for_driver(query.driver_id),
        query.driver_id,
        range,
    );

    Ok(Json(paginate(queue, query.page, state.page_size)))
}

async fn completed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompletedQueueQuery>,
) -> Result<Json<Page<Order>>, AppError> {
    if state.drivers.get(query.driver_id).is_none() {
        return Err(AppError::NotFound(format!(
            "driver {} not found",
            query.driver_id
        )));
    }

    let queue = completed_queue(state.orders.list_for_driver(query.driver_id), query.driver_id);

    Ok(Json(paginate(queue, query.page, state.page_size)))
}

async fn matched(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchedQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let slot = state
        .drivers
        .get_slot(query.slot_id)
        .ok_or_else(|| AppError::NotFound(format!("slot {} not found", query.slot_id)))?;

    if slot.driver_id != query.driver_id {
        return Err(AppError::Validation(
            "slot does not belong to the requesting driver".to_string(),
        ));
    }

    let mode = query.mode.unwrap_or(MatchMode::Strict);
    let now = Utc::now().naive_utc();

    Ok(Json(matching_orders(
        state.orders.list(None),
        &slot,
        mode,
        now,
    )))
}
