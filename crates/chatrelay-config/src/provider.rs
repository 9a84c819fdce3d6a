use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Upstream timeout used when none is configured
pub const DEFAULT_TIMEOUT: &str = "30s";

/// Configuration for the upstream completion provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider protocol type
    #[serde(rename = "type", default)]
    pub provider_type: ProviderType,
    /// Resource endpoint (Azure) or API base URL (OpenAI-compatible)
    pub endpoint: Url,
    /// API credential
    pub api_key: SecretString,
    /// API version sent as the `api-version` query parameter (Azure only)
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Deployment name (Azure) or model identifier (OpenAI-compatible)
    pub deployment: String,
    /// Upper bound on a single upstream round trip (e.g. "30s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl ProviderConfig {
    /// Parse the configured upstream timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is malformed
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid provider timeout '{}': {e}", self.timeout))
    }
}

/// Supported provider protocols
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Azure OpenAI deployment API
    #[default]
    AzureOpenai,
    /// OpenAI-compatible chat completions API
    Openai,
}

impl ProviderType {
    /// Stable name used in logs and diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AzureOpenai => "azure_openai",
            Self::Openai => "openai",
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout() -> String {
    DEFAULT_TIMEOUT.to_string()
}
