use std::net::SocketAddr;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    Config, DEFAULT_API_VERSION, DEFAULT_TIMEOUT, ProviderConfig, ProviderType, RelayConfig, ServerConfig, TelemetryConfig,
};

/// Environment variables consulted by [`Config::from_env`]
pub const ENV_API_KEY: &str = "AZURE_OPENAI_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_VERSION";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const ENV_PORT: &str = "PORT";
pub const ENV_RELAY_ENABLED: &str = "CHATRELAY_RELAY_ENABLED";

/// Routes mounted unconditionally by the server
const RESERVED_PATHS: [&str; 3] = ["/", "/api/info", "/api/chat"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, deserializes,
    /// inlines the system instruction file if one is set, then validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let mut config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.relay.resolve_instruction_file()?;
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from the process environment alone
    ///
    /// Used when no configuration file is present. Reads the Azure `OpenAI`
    /// credentials, endpoint, API version and deployment, plus `PORT`.
    /// Setting `CHATRELAY_RELAY_ENABLED=false` starts the service without
    /// the chat endpoint and without requiring provider settings.
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing variable, or if a value is
    /// malformed
    pub fn from_env() -> anyhow::Result<Self> {
        let relay_enabled = match non_empty_var(ENV_RELAY_ENABLED) {
            None => true,
            Some(value) => parse_bool(&value)
                .ok_or_else(|| anyhow::anyhow!("{ENV_RELAY_ENABLED} must be 'true' or 'false', got '{value}'"))?,
        };

        let port = match non_empty_var(ENV_PORT) {
            None => crate::DEFAULT_PORT,
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid {ENV_PORT} '{value}': {e}"))?,
        };

        let provider = if relay_enabled {
            Some(provider_from_env()?)
        } else {
            None
        };

        let config = Self {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([0, 0, 0, 0], port))),
                ..ServerConfig::default()
            },
            provider,
            relay: RelayConfig {
                enabled: relay_enabled,
                ..RelayConfig::default()
            },
            ..Self::default()
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the relay is enabled without a usable provider,
    /// if sampling parameters are out of range, or if endpoint paths are
    /// malformed
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_relay()?;
        if let Some(provider) = self.active_provider() {
            validate_provider(provider)?;
        }
        if let Some(telemetry) = &self.telemetry {
            validate_telemetry(telemetry)?;
        }
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        let debug = &self.server.debug;

        let endpoints = [("health", health.enabled, &health.path), ("debug", debug.enabled, &debug.path)];
        for (name, _, path) in endpoints.iter().filter(|(_, enabled, _)| *enabled) {
            if !path.starts_with('/') {
                anyhow::bail!("server.{name}.path must start with '/': {path}");
            }

            // Routes are static; parameter and wildcard syntax would be rejected by the router
            if path.contains(['{', '}', '*']) {
                anyhow::bail!("server.{name}.path must be a static path without '{{', '}}' or '*': {path}");
            }

            if RESERVED_PATHS.contains(&path.as_str()) {
                anyhow::bail!("server.{name}.path {path} is reserved");
            }
        }

        if health.enabled && debug.enabled && health.path == debug.path {
            anyhow::bail!("server.health.path and server.debug.path must differ");
        }

        Ok(())
    }

    fn validate_relay(&self) -> anyhow::Result<()> {
        let relay = &self.relay;
        if !relay.enabled {
            return Ok(());
        }

        if self.provider.is_none() {
            anyhow::bail!("relay is enabled but no [provider] section is configured");
        }

        if relay.max_tokens == 0 {
            anyhow::bail!("relay.max_tokens must be greater than 0");
        }

        if !(0.0..=2.0).contains(&relay.temperature) {
            anyhow::bail!("relay.temperature must be between 0 and 2, got {}", relay.temperature);
        }

        if !(relay.top_p > 0.0 && relay.top_p <= 1.0) {
            anyhow::bail!("relay.top_p must be in (0, 1], got {}", relay.top_p);
        }

        if relay.system_instruction_file.is_some() {
            anyhow::bail!("relay.system_instruction_file has not been resolved");
        }

        if relay.system_instruction().is_empty() {
            anyhow::bail!("relay.system_instruction must not be empty");
        }

        Ok(())
    }
}

fn validate_provider(provider: &ProviderConfig) -> anyhow::Result<()> {
    if !matches!(provider.endpoint.scheme(), "http" | "https") {
        anyhow::bail!("provider.endpoint must be an http(s) URL: {}", provider.endpoint);
    }

    if provider.api_key.expose_secret().trim().is_empty() {
        anyhow::bail!("provider.api_key must not be empty");
    }

    if provider.deployment.trim().is_empty() {
        anyhow::bail!("provider.deployment must not be empty");
    }

    if provider.provider_type == ProviderType::AzureOpenai && provider.api_version.trim().is_empty() {
        anyhow::bail!("provider.api_version must not be empty for azure_openai");
    }

    if provider.timeout()?.is_zero() {
        anyhow::bail!("provider.timeout must be greater than 0");
    }

    Ok(())
}

fn validate_telemetry(telemetry: &TelemetryConfig) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&telemetry.sampling_rate) {
        anyhow::bail!(
            "telemetry.sampling_rate must be between 0 and 1, got {}",
            telemetry.sampling_rate
        );
    }

    if let Some(exporter) = &telemetry.exporter
        && exporter.interval()?.is_zero()
    {
        anyhow::bail!("telemetry.exporter.interval must be greater than 0");
    }

    Ok(())
}

fn provider_from_env() -> anyhow::Result<ProviderConfig> {
    let api_key = non_empty_var(ENV_API_KEY);
    let endpoint = non_empty_var(ENV_ENDPOINT);
    let deployment = non_empty_var(ENV_DEPLOYMENT);

    let missing: Vec<&str> = [(ENV_API_KEY, &api_key), (ENV_ENDPOINT, &endpoint), (ENV_DEPLOYMENT, &deployment)]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();

    let (Some(api_key), Some(endpoint), Some(deployment)) = (api_key, endpoint, deployment) else {
        anyhow::bail!("missing required configuration: {}", missing.join(", "));
    };

    let endpoint = Url::parse(&endpoint).map_err(|e| anyhow::anyhow!("invalid {ENV_ENDPOINT}: {e}"))?;

    Ok(ProviderConfig {
        provider_type: ProviderType::AzureOpenai,
        endpoint,
        api_key: SecretString::from(api_key),
        api_version: non_empty_var(ENV_API_VERSION).unwrap_or_else(|| DEFAULT_API_VERSION.to_owned()),
        deployment,
        timeout: DEFAULT_TIMEOUT.to_owned(),
    })
}

/// Read a variable, treating empty values as unset
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
