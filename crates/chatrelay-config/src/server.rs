use std::net::SocketAddr;

use serde::Deserialize;

use crate::health::{DebugConfig, HealthConfig};

/// Default port, matching the one used when `PORT` is unset
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl ServerConfig {
    /// Listen address, falling back to all interfaces on the default port
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }
}
