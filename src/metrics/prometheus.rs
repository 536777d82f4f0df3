use ::metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus HTTP exporter on the given port.
/// After this call, any metrics recorded via the `metrics` crate
/// macros (counter!, gauge!) are automatically exported at /metrics.
pub fn init_metrics_server(port: u16) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
}

// ── Quote metrics ────────────────────────────────────────────────

pub fn record_fetch_ok() {
    counter!("quote_fetch_total", "outcome" => "ok").increment(1);
}

pub fn record_fetch_failure(kind: &'static str) {
    counter!("quote_fetch_total", "outcome" => kind).increment(1);
}

pub fn record_last_price(price: f64) {
    gauge!("last_price").set(price);
}

// ── Notification metrics ─────────────────────────────────────────

pub fn record_notification() {
    counter!("notifications_sent_total").increment(1);
}

/// `outcome` is one of `delivered`, `failed`, `evicted`.
pub fn record_delivery(outcome: &'static str) {
    counter!("deliveries_total", "outcome" => outcome).increment(1);
}

pub fn record_subscriber_count(count: usize) {
    gauge!("subscribers").set(count as f64);
}
