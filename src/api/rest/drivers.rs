use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::parse_date_range;
use crate::engine::aggregate::{aggregate_items, LocationGroup};
use crate::engine::lifecycle::is_valid_phone;
use crate::error::AppError;
use crate::models::driver::{AvailabilitySlot, Driver};
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(create_driver))
        .route("/drivers/:id", get(get_driver))
        .route("/drivers/by-phone/:phone", get(get_driver_by_phone))
        .route("/drivers/:id/orders", get(list_driver_orders))
        .route("/drivers/:id/manifest", get(driver_manifest))
        .route("/drivers/:id/slots", post(create_slot).get(list_driver_slots))
        .route("/slots", get(list_slots))
        .route("/slots/:id", delete(delete_slot))
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub phone: String,
    pub direction: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSlotRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
}

#[derive(Deserialize)]
struct DateRangeQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if !is_valid_phone(&payload.phone) {
        return Err(AppError::Validation(
            "phone must be 7 to 10 digits".to_string(),
        ));
    }

    let driver = state.drivers.register(Driver {
        id: Uuid::new_v4(),
        name: payload.name,
        phone: payload.phone,
        direction: payload.direction,
        created_at: Utc::now(),
    })?;

    Ok(Json(driver))
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Driver>, AppError> {
    let driver = state
        .drivers
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    Ok(Json(driver))
}

async fn get_driver_by_phone(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let driver = state
        .drivers
        .find_by_phone(&phone)
        .ok_or_else(|| AppError::NotFound(format!("no driver with phone {phone}")))?;

    Ok(Json(driver))
}

async fn list_driver_orders(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, AppError> {
    if state.drivers.get(id).is_none() {
        return Err(AppError::NotFound(format!("driver {id} not found")));
    }

    Ok(Json(state.orders.list_for_driver(id)))
}

async fn driver_manifest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<LocationGroup>>, AppError> {
    if state.drivers.get(id).is_none() {
        return Err(AppError::NotFound(format!("driver {id} not found")));
    }

    let range = parse_date_range(query.start_date, query.end_date)?;
    let orders = state.orders.list_for_driver(id);

    Ok(Json(aggregate_items(&orders, range)))
}

async fn create_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<Json<AvailabilitySlot>, AppError> {
    if payload.end_time <= payload.start_time {
        return Err(AppError::Validation(
            "slot end time must be after start time".to_string(),
        ));
    }
    if payload.location.trim().is_empty() {
        return Err(AppError::Validation("location cannot be empty".to_string()));
    }

    let slot = state.drivers.add_slot(AvailabilitySlot {
        id: Uuid::new_v4(),
        driver_id: id,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
    })?;

    Ok(Json(slot))
}

async fn list_driver_slots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    if state.drivers.get(id).is_none() {
        return Err(AppError::NotFound(format!("driver {id} not found")));
    }

    Ok(Json(state.drivers.slots_for(id)))
}

async fn list_slots(State(state): State<Arc<AppState>>) -> Json<Vec<AvailabilitySlot>> {
    Json(state.drivers.list_slots())
}

async fn delete_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.drivers.delete_slot(id)?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
