//! Metric names and recording helpers

use std::time::Instant;

use opentelemetry::metrics::Histogram;

/// Record the seconds elapsed since `start` on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

/// Instrumentation scope for relay metrics
pub const METER_NAME: &str = "chatrelay";

/// Chat requests by terminal outcome (`outcome` attribute)
pub const RELAY_REQUEST_COUNT: &str = "chatrelay.relay.requests";
/// Upstream round-trip duration in seconds
pub const RELAY_REQUEST_DURATION: &str = "chatrelay.relay.duration";
/// Total tokens reported by the provider
pub const RELAY_TOKEN_USAGE: &str = "chatrelay.relay.tokens";
