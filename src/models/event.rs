use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::order::DriverActionKind;

/// Broadcast after every successful lifecycle transition so connected
/// clients can refresh their queues instead of trusting local state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: Uuid,
    pub driver_id: Uuid,
    pub kind: DriverActionKind,
    pub at: DateTime<Utc>,
}
