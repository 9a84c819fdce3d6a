#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
mod loader;
pub mod provider;
pub mod relay;
pub mod server;
pub mod service;
pub mod telemetry;

use serde::Deserialize;

pub use env::ExpandError;
pub use health::*;
pub use provider::*;
pub use relay::*;
pub use server::*;
pub use service::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level chatrelay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Service metadata reported by the informational endpoints
    #[serde(default)]
    pub service: ServiceConfig,
    /// Upstream completion provider
    #[serde(default)]
    pub provider: Option<ProviderConfig>,
    /// Completion relay behavior
    #[serde(default)]
    pub relay: RelayConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Config {
    /// Provider configuration, present only when the relay is enabled
    pub fn active_provider(&self) -> Option<&ProviderConfig> {
        if self.relay.enabled { self.provider.as_ref() } else { None }
    }
}
