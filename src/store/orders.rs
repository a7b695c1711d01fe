use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::Driver;
use crate::models::order::{
    DriverAction, DriverActionKind, Order, OrderStatus, PreviousDriver, Service,
};

/// Durable record of orders. Lifecycle writes go through [`accept`],
/// [`transfer`] and [`complete`] only; each mutates under the entry lock, so
/// the status check and the field write commit atomically.
///
/// [`accept`]: OrderStore::accept
/// [`transfer`]: OrderStore::transfer
/// [`complete`]: OrderStore::complete
pub struct OrderStore {
    orders: DashMap<Uuid, Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }

    pub fn insert(&self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn get(&self, id: Uuid) -> Option<Order> {
        self.orders.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self, service: Option<Service>) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|entry| service.is_none_or(|s| entry.value().service == s))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Orders currently or previously assigned to the driver.
    pub fn list_for_driver(&self, driver_id: Uuid) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|entry| entry.value().assigned_driver == Some(driver_id))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Compare-and-set acceptance: succeeds only from `Unaccepted`. A retry
    /// that finds the order already accepted by the same driver is reported
    /// as success, since the earlier attempt must have committed.
    pub fn accept(&self, order_id: Uuid, driver: &Driver) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        match order.status {
            OrderStatus::Unaccepted => {
                order.status = OrderStatus::Accepted;
                order.assigned_driver = Some(driver.id);
                order.actions.push(DriverAction {
                    driver_id: driver.id,
                    kind: DriverActionKind::Accepted,
                    at: Utc::now(),
                });
                Ok(order.clone())
            }
            OrderStatus::Accepted if order.assigned_driver == Some(driver.id) => {
                Ok(order.clone())
            }
            OrderStatus::Accepted => Err(AppError::Conflict(format!(
                "order {order_id} was already accepted by another driver"
            ))),
            OrderStatus::Completed => Err(AppError::AlreadyTerminal(format!(
                "order {order_id} is already completed"
            ))),
        }
    }

    /// Re-assigns an accepted order from `from` to `to`, recording the
    /// outgoing driver as transfer lineage. Status stays `Accepted`.
    pub fn transfer(&self, order_id: Uuid, from: &Driver, to: &Driver) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        match order.status {
            OrderStatus::Completed => Err(AppError::AlreadyTerminal(format!(
                "order {order_id} is already completed"
            ))),
            OrderStatus::Unaccepted => Err(AppError::NotAssigned(format!(
                "order {order_id} has not been accepted"
            ))),
            OrderStatus::Accepted if order.assigned_driver != Some(from.id) => {
                Err(AppError::NotAssigned(format!(
                    "order {order_id} is not held by driver {}",
                    from.id
                )))
            }
            OrderStatus::Accepted => {
                order.assigned_driver = Some(to.id);
                order.previous_driver = Some(PreviousDriver {
                    id: from.id,
                    name: from.name.clone(),
                    phone: from.phone.clone(),
                });
                order.actions.push(DriverAction {
                    driver_id: from.id,
                    kind: DriverActionKind::Transferred,
                    at: Utc::now(),
                });
                Ok(order.clone())
            }
        }
    }

    /// Terminal transition, guarded by current assignment. A completed order
    /// never changes again; its completion timestamp is written exactly once.
    pub fn complete(&self, order_id: Uuid, driver_id: Uuid) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        match order.status {
            OrderStatus::Completed => Err(AppError::AlreadyTerminal(format!(
                "order {order_id} is already completed"
            ))),
            OrderStatus::Unaccepted => Err(AppError::NotAssigned(format!(
                "order {order_id} has not been accepted"
            ))),
            OrderStatus::Accepted if order.assigned_driver != Some(driver_id) => {
                Err(AppError::NotAssigned(format!(
                    "order {order_id} is not held by driver {driver_id}"
                )))
            }
            OrderStatus::Accepted => {
                order.status = OrderStatus::Completed;
                order.completed_at = Some(Utc::now());
                order.actions.push(DriverAction {
                    driver_id,
                    kind: DriverActionKind::Completed,
                    at: Utc::now(),
                });
                Ok(order.clone())
            }
        }
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
