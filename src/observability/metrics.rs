use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub transitions_total: IntCounterVec,
    pub unaccepted_orders: IntGauge,
    pub transition_latency_seconds: HistogramVec,
    pub driver_active_orders: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let transitions_total = IntCounterVec::new(
            Opts::new(
                "transitions_total",
                "Total lifecycle transitions by operation and outcome",
            ),
            &["op", "outcome"],
        )
        .expect("valid transitions_total metric");

        let unaccepted_orders =
            IntGauge::new("unaccepted_orders", "Current number of unaccepted orders")
                .expect("valid unaccepted_orders metric");

        let transition_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "transition_latency_seconds",
                "Latency of lifecycle transitions in seconds",
            ),
            &["op"],
        )
        .expect("valid transition_latency_seconds metric");

        let driver_active_orders = GaugeVec::new(
            Opts::new(
                "driver_active_orders",
                "Accepted orders currently held per driver",
            ),
            &["driver_id"],
        )
        .expect("valid driver_active_orders metric");

        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");
        registry
            .register(Box::new(unaccepted_orders.clone()))
            .expect("register unaccepted_orders");
        registry
            .register(Box::new(transition_latency_seconds.clone()))
            .expect("register transition_latency_seconds");
        registry
            .register(Box::new(driver_active_orders.clone()))
            .expect("register driver_active_orders");

        Self {
            registry,
            transitions_total,
            unaccepted_orders,
            transition_latency_seconds,
            driver_active_orders,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
