use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::{AvailabilitySlot, Driver};

/// Registry of drivers and their availability postings. Phone numbers are
/// unique; transfers resolve their target through [`find_by_phone`].
///
/// [`find_by_phone`]: DriverRegistry::find_by_phone
pub struct DriverRegistry {
    drivers: DashMap<Uuid, Driver>,
    slots: DashMap<Uuid, AvailabilitySlot>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self {
            drivers: DashMap::new(),
            slots: DashMap::new(),
        }
    }

    pub fn register(&self, driver: Driver) -> Result<Driver, AppError> {
        if self
            .drivers
            .iter()
            .any(|entry| entry.value().phone == driver.phone)
        {
            return Err(AppError::Conflict(format!(
                "phone {} is already registered",
                driver.phone
            )));
        }

        self.drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    pub fn get(&self, id: Uuid) -> Option<Driver> {
        self.drivers.get(&id).map(|entry| entry.value().clone())
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<Driver> {
        self.drivers
            .iter()
            .find(|entry| entry.value().phone == phone)
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn add_slot(&self, slot: AvailabilitySlot) -> Result<AvailabilitySlot, AppError> {
        if !self.drivers.contains_key(&slot.driver_id) {
            return Err(AppError::NotFound(format!(
                "driver {} not found",
                slot.driver_id
            )));
        }

        self.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    pub fn delete_slot(&self, id: Uuid) -> Result<(), AppError> {
        self.slots
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("slot {id} not found")))
    }

    pub fn get_slot(&self, id: Uuid) -> Option<AvailabilitySlot> {
        self.slots.get(&id).map(|entry| entry.value().clone())
    }

    pub fn slots_for(&self, driver_id: Uuid) -> Vec<AvailabilitySlot> {
        self.slots
            .iter()
            .filter(|entry| entry.value().driver_id == driver_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn list_slots(&self) -> Vec<AvailabilitySlot> {
        self.slots
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
