//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use chatrelay_config::{Config, ProviderConfig, ProviderType, RelayConfig, ServerConfig};
use secrecy::SecretString;

/// API key handed to mock providers
pub const TEST_API_KEY: &str = "test-key-do-not-leak";

/// Deployment name used by the builder's providers
pub const TEST_DEPLOYMENT: &str = "mock-deployment";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                relay: RelayConfig::default(),
                ..Config::default()
            },
        }
    }

    /// Add an Azure `OpenAI` provider pointed at a mock backend
    pub fn with_azure_provider(self, endpoint: &str) -> Self {
        self.with_provider(ProviderType::AzureOpenai, endpoint)
    }

    /// Add an OpenAI-compatible provider pointed at a mock backend
    pub fn with_openai_provider(self, base_url: &str) -> Self {
        self.with_provider(ProviderType::Openai, base_url)
    }

    fn with_provider(mut self, provider_type: ProviderType, endpoint: &str) -> Self {
        self.config.provider = Some(ProviderConfig {
            provider_type,
            endpoint: endpoint.parse().expect("valid URL"),
            api_key: SecretString::from(TEST_API_KEY),
            api_version: "2024-02-01".to_owned(),
            deployment: TEST_DEPLOYMENT.to_owned(),
            timeout: "5s".to_owned(),
        });
        self
    }

    /// Set the upstream timeout of the configured provider
    pub fn with_timeout(mut self, timeout: &str) -> Self {
        if let Some(provider) = self.config.provider.as_mut() {
            timeout.clone_into(&mut provider.timeout);
        }
        self
    }

    /// Replace the system instruction
    pub fn with_system_instruction(mut self, instruction: &str) -> Self {
        self.config.relay.system_instruction = Some(instruction.to_owned());
        self
    }

    /// Serve only the informational endpoints
    pub fn without_relay(mut self) -> Self {
        self.config.relay.enabled = false;
        self
    }

    /// Enable the debug endpoint
    pub fn with_debug(mut self) -> Self {
        self.config.server.debug.enabled = true;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
