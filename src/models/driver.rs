use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    /// Unique across the registry; transfers address the target by phone.
    pub phone: String,
    pub direction: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A declared (date, time window, staging location) posting. Slots are
/// created and deleted, never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
}

impl AvailabilitySlot {
    /// End of the window as a comparable instant.
    pub fn window_end(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }
}
