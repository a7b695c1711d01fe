use tokio::sync::broadcast;

use crate::models::event::OrderEvent;
use crate::observability::metrics::Metrics;
use crate::store::drivers::DriverRegistry;
use crate::store::orders::OrderStore;

pub struct AppState {
    pub orders: OrderStore,
    pub drivers: DriverRegistry,
    pub events_tx: broadcast::Sender<OrderEvent>,
    pub metrics: Metrics,
    pub page_size: usize,
}

impl AppState {
    pub fn new(event_buffer_size: usize, page_size: usize) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            orders: OrderStore::new(),
            drivers: DriverRegistry::new(),
            events_tx,
            metrics: Metrics::new(),
            page_size,
        }
    }
}
