use std::time::Instant;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::Driver;
use crate::models::event::OrderEvent;
use crate::models::order::{DriverActionKind, Order, OrderItem, OrderStatus, Service};
use crate::state::AppState;

/// Declared totals may drift from the item sum by float rounding only.
const TOTAL_PRICE_TOLERANCE: f64 = 0.01;

pub fn is_valid_phone(phone: &str) -> bool {
    (7..=10).contains(&phone.len()) && phone.chars().all(|c| c.is_ascii_digit())
}

#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub location: String,
    #[serde(default)]
    pub is_urgent: bool,
    pub deadline_date: NaiveDate,
    pub deadline_time: NaiveTime,
    pub note: Option<String>,
    pub service: Service,
}

/// Buyer checkout path. Validates locally before touching the store; the
/// declared total is recomputed from the item list and rejected on mismatch
/// rather than trusted.
pub fn create_order(state: &AppState, new: NewOrder) -> Result<Order, AppError> {
    if new.buyer_name.trim().is_empty() {
        return Err(AppError::Validation("buyer name cannot be empty".to_string()));
    }
    if !is_valid_phone(&new.buyer_phone) {
        return Err(AppError::Validation(
            "buyer phone must be 7 to 10 digits".to_string(),
        ));
    }
    if new.items.is_empty() {
        return Err(AppError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }

    let order = Order {
        id: Uuid::new_v4(),
        buyer_id: new.buyer_id,
        buyer_name: new.buyer_name,
        buyer_phone: new.buyer_phone,
        items: new.items,
        total_price: new.total_price,
        location: new.location,
        is_urgent: new.is_urgent,
        deadline_date: new.deadline_date,
        deadline_time: new.deadline_time,
        note: new.note,
        service: new.service,
        status: OrderStatus::Unaccepted,
        assigned_driver: None,
        previous_driver: None,
        actions: Vec::new(),
        created_at: Utc::now(),
        completed_at: None,
    };

    let computed = order.computed_total();
    if (computed - order.total_price).abs() > TOTAL_PRICE_TOLERANCE {
        return Err(AppError::Validation(format!(
            "declared total {} does not match item total {computed}",
            order.total_price
        )));
    }

    state.orders.insert(order.clone());
    refresh_unaccepted_gauge(state);

    info!(order_id = %order.id, service = ?order.service, urgent = order.is_urgent, "order created");
    Ok(order)
}

/// The contended path: first caller wins, everyone else gets `Conflict`.
pub fn accept_order(state: &AppState, order_id: Uuid, driver_id: Uuid) -> Result<Order, AppError> {
    let driver = resolve_driver(state, driver_id)?;

    let start = Instant::now();
    let result = state.orders.accept(order_id, &driver);
    observe(state, "accept", &result, start);

    match result {
        Ok(order) => {
            refresh_unaccepted_gauge(state);
            refresh_driver_gauge(state, driver.id);
            emit(state, &order, driver.id, DriverActionKind::Accepted);
            info!(order_id = %order.id, driver_id = %driver.id, "order accepted");
            Ok(order)
        }
        Err(err) => {
            warn!(order_id = %order_id, driver_id = %driver_id, error = %err, "accept rejected");
            Err(err)
        }
    }
}

/// Hand-off to a driver named by phone. The phone is validated locally
/// before any registry lookup, and resolution happens before the store
/// write, so a bad target never mutates the order.
pub fn transfer_order(
    state: &AppState,
    order_id: Uuid,
    from_driver_id: Uuid,
    new_driver_phone: &str,
) -> Result<Order, AppError> {
    if !is_valid_phone(new_driver_phone) {
        return Err(AppError::Validation(
            "new driver phone must be 7 to 10 digits".to_string(),
        ));
    }

    let from = resolve_driver(state, from_driver_id)?;
    let to = state
        .drivers
        .find_by_phone(new_driver_phone)
        .ok_or_else(|| {
            AppError::UnknownDriver(format!(
                "no registered driver with phone {new_driver_phone}"
            ))
        })?;

    let start = Instant::now();
    let result = state.orders.transfer(order_id, &from, &to);
    observe(state, "transfer", &result, start);

    match result {
        Ok(order) => {
            refresh_driver_gauge(state, from.id);
            refresh_driver_gauge(state, to.id);
            emit(state, &order, from.id, DriverActionKind::Transferred);
            info!(order_id = %order.id, from = %from.id, to = %to.id, "order transferred");
            Ok(order)
        }
        Err(err) => {
            warn!(order_id = %order_id, driver_id = %from_driver_id, error = %err, "transfer rejected");
            Err(err)
        }
    }
}

pub fn complete_order(state: &AppState, order_id: Uuid, driver_id: Uuid) -> Result<Order, AppError> {
    let driver = resolve_driver(state, driver_id)?;

    let start = Instant::now();
    let result = state.orders.complete(order_id, driver.id);
    observe(state, "complete", &result, start);

    match result {
        Ok(order) => {
            refresh_driver_gauge(state, driver.id);
            emit(state, &order, driver.id, DriverActionKind::Completed);
            info!(order_id = %order.id, driver_id = %driver.id, "order completed");
            Ok(order)
        }
        Err(err) => {
            warn!(order_id = %order_id, driver_id = %driver_id, error = %err, "complete rejected");
            Err(err)
        }
    }
}

fn resolve_driver(state: &AppState, driver_id: Uuid) -> Result<Driver, AppError> {
    state
        .drivers
        .get(driver_id)
        .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))
}

fn observe(state: &AppState, op: &str, result: &Result<Order, AppError>, started: Instant) {
    let outcome = if result.is_ok() { "success" } else { "rejected" };
    state
        .metrics
        .transition_latency_seconds
        .with_label_values(&[op])
        .observe(started.elapsed().as_secs_f64());
    state
        .metrics
        .transitions_total
        .with_label_values(&[op, outcome])
        .inc();
}

fn emit(state: &AppState, order: &Order, driver_id: Uuid, kind: DriverActionKind) {
    let _ = state.events_tx.send(OrderEvent {
        order_id: order.id,
        driver_id,
        kind,
        at: Utc::now(),
    });
}

fn refresh_unaccepted_gauge(state: &AppState) {
    let unaccepted = state
        .orders
        .list(None)
        .iter()
        .filter(|order| order.status == OrderStatus::Unaccepted)
        .count();
    state.metrics.unaccepted_orders.set(unaccepted as i64);
}

fn refresh_driver_gauge(state: &AppState, driver_id: Uuid) {
    let held = state
        .orders
        .list_for_driver(driver_id)
        .iter()
        .filter(|order| order.status == OrderStatus::Accepted)
        .count();
    state
        .metrics
        .driver_active_orders
        .with_label_values(&[&driver_id.to_string()])
        .set(held as f64);
}
