use std::collections::BTreeMap;

use chatrelay_config::TelemetryConfig;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource as semconv;

const SERVICE_NAMESPACE_KEY: &str = "service.namespace";

/// Namespace shared by every chatrelay deployment
const SERVICE_NAMESPACE: &str = "chatrelay";

/// Resource attributes for exported telemetry
///
/// Configured `resource_attributes` take precedence over the built-in
/// service name, version and namespace.
fn resource_attributes(config: &TelemetryConfig) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::from([
        (semconv::SERVICE_NAME.to_owned(), config.service_name.clone()),
        (semconv::SERVICE_VERSION.to_owned(), env!("CARGO_PKG_VERSION").to_owned()),
        (SERVICE_NAMESPACE_KEY.to_owned(), SERVICE_NAMESPACE.to_owned()),
    ]);

    attrs.extend(config.resource_attributes.clone());
    attrs
}

/// Build an OpenTelemetry Resource from configuration
pub fn build_resource(config: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_attributes(
            resource_attributes(config)
                .into_iter()
                .map(|(key, value)| KeyValue::new(key, value)),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_attributes_override_defaults() {
        let config = TelemetryConfig {
            service_name: "relay-eu".to_owned(),
            resource_attributes: [
                ("deployment.environment".to_owned(), "staging".to_owned()),
                ("service.namespace".to_owned(), "support".to_owned()),
            ]
            .into(),
            ..TelemetryConfig::default()
        };

        let attrs = resource_attributes(&config);

        assert_eq!(attrs["service.name"], "relay-eu");
        assert_eq!(attrs["service.namespace"], "support");
        assert_eq!(attrs["deployment.environment"], "staging");
        assert!(attrs.contains_key("service.version"));
    }
}
