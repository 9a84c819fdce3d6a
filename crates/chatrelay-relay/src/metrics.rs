use std::time::Instant;

use chatrelay_telemetry::metrics::{RELAY_REQUEST_COUNT, RELAY_REQUEST_DURATION, RELAY_TOKEN_USAGE, record_duration};
use chatrelay_telemetry::{Counter, Histogram, KeyValue};

use crate::relay::RelayOutcome;

/// Instruments recorded by the relay
pub struct RelayMetrics {
    requests: Counter<u64>,
    duration: Histogram<f64>,
    tokens: Counter<u64>,
}

impl RelayMetrics {
    pub fn new() -> Self {
        let meter = chatrelay_telemetry::meter();

        Self {
            requests: meter
                .u64_counter(RELAY_REQUEST_COUNT)
                .with_description("Chat requests by terminal outcome")
                .build(),
            duration: meter
                .f64_histogram(RELAY_REQUEST_DURATION)
                .with_description("Upstream completion round-trip time")
                .with_unit("s")
                .build(),
            tokens: meter
                .u64_counter(RELAY_TOKEN_USAGE)
                .with_description("Total tokens reported by the provider")
                .build(),
        }
    }

    pub fn record_outcome(&self, outcome: RelayOutcome) {
        self.requests.add(1, &[KeyValue::new("outcome", outcome.as_str())]);
    }

    pub fn record_round_trip(&self, provider: &str, start: Instant, tokens_used: Option<u32>) {
        let attributes = [KeyValue::new("provider", provider.to_owned())];
        record_duration(&self.duration, start, &attributes);
        if let Some(tokens) = tokens_used {
            self.tokens.add(u64::from(tokens), &attributes);
        }
    }
}
