use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Default OTLP export interval
pub const DEFAULT_EXPORT_INTERVAL: &str = "30s";

/// Telemetry configuration
///
/// Console logging is always on; traces and metrics are exported only when
/// `[telemetry.exporter]` is present.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name for telemetry metadata
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Additional resource attributes
    #[serde(default)]
    pub resource_attributes: HashMap<String, String>,
    /// Console log output format
    #[serde(default)]
    pub log_format: LogFormat,
    /// OTLP collector shared by traces and metrics
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
    /// Fraction of root traces to sample (0.0 to 1.0)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            resource_attributes: HashMap::new(),
            log_format: LogFormat::default(),
            exporter: None,
            sampling_rate: default_sampling_rate(),
        }
    }
}

/// Console log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// OTLP exporter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// OTLP endpoint URL
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
    /// Export traces
    #[serde(default = "default_true")]
    pub traces: bool,
    /// Export metrics
    #[serde(default = "default_true")]
    pub metrics: bool,
    /// Metric export interval (e.g. "30s")
    #[serde(default = "default_export_interval")]
    pub interval: String,
}

impl ExporterConfig {
    /// Parse the metric export interval
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not a valid duration
    pub fn interval(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.interval)
            .map_err(|e| anyhow::anyhow!("invalid telemetry export interval '{}': {e}", self.interval))
    }
}

/// OTLP export protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    HttpProto,
}

fn default_service_name() -> String {
    "chatrelay".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_rate() -> f64 {
    1.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

fn default_export_interval() -> String {
    DEFAULT_EXPORT_INTERVAL.to_owned()
}
