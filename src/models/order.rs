use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bucket used when an item declares no source location.
pub const UNSPECIFIED_LOCATION: &str = "unspecified";

/// Partitions order pools: daily necessities vs. agricultural produce runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Necessities,
    Agricultural,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Unaccepted,
    Accepted,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    /// Where the driver picks this item up. `None` falls into the
    /// [`UNSPECIFIED_LOCATION`] bucket during aggregation.
    pub location: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DriverActionKind {
    Accepted,
    Transferred,
    Completed,
}

/// Append-only record of a driver acting on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverAction {
    pub driver_id: Uuid,
    pub kind: DriverActionKind,
    pub at: DateTime<Utc>,
}

/// Identity of the driver an order was taken over from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviousDriver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    /// Drop-off destination for the whole order.
    pub location: String,
    pub is_urgent: bool,
    /// Latest acceptable acceptance moment, split into date and time the way
    /// buyers declare it.
    pub deadline_date: NaiveDate,
    pub deadline_time: NaiveTime,
    pub note: Option<String>,
    pub service: Service,
    pub status: OrderStatus,
    pub assigned_driver: Option<Uuid>,
    pub previous_driver: Option<PreviousDriver>,
    pub actions: Vec<DriverAction>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Deadline as a single comparable instant.
    pub fn deadline(&self) -> NaiveDateTime {
        self.deadline_date.and_time(self.deadline_time)
    }

    /// Sum of `price * quantity` over all items.
    pub fn computed_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * item.quantity as f64)
            .sum()
    }
}
