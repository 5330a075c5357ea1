use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use tracing::warn;

lazy_static! {
    pub static ref ANNOUNCE_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("announce_calls_total", "Announce calls issued, by publisher path"),
        &["path"]
    )
    .expect("metric can not be created");

    pub static ref ANNOUNCE_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("announce_failures_total", "Announce calls that returned an error, by publisher path"),
        &["path"]
    )
    .expect("metric can not be created");

    pub static ref PUBLISHER_RESTARTS: IntCounter = IntCounter::new(
        "publisher_restarts_total",
        "Publisher restarts performed by the supervisor"
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER: Once = Once::new();

/// Registers the crate collectors with [`REGISTRY`]; later calls are no-ops.
pub fn register_custom_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(ANNOUNCE_CALLS.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(ANNOUNCE_FAILURES.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(PUBLISHER_RESTARTS.clone()))
            .expect("collector can be registered");
    });
}

/// Export metrics in the Prometheus text format
pub fn gather_metrics() -> String {
    register_custom_metrics();

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        warn!("could not encode custom metrics: {}", e);
    };
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            warn!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_metrics_exposes_crate_collectors() {
        ANNOUNCE_CALLS.with_label_values(&["drain"]).inc();
        PUBLISHER_RESTARTS.inc();

        let body = gather_metrics();

        assert!(body.contains("announce_calls_total"));
        assert!(body.contains("publisher_restarts_total"));
    }

    #[test]
    fn test_register_custom_metrics_is_idempotent() {
        register_custom_metrics();
        register_custom_metrics();
    }
}
