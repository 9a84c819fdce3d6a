use serde::Deserialize;

/// Metadata reported by `/health` and `/api/info`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_name")]
    pub name: String,
    /// Human-readable description of what the assistant can do
    #[serde(default = "default_capabilities")]
    pub capabilities: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            capabilities: default_capabilities(),
        }
    }
}

fn default_name() -> String {
    "chatrelay".to_string()
}

fn default_capabilities() -> String {
    "General answers with Yu-Gi-Oh! expertise".to_string()
}
