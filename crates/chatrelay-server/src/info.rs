//! Liveness, metadata and diagnostics handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chatrelay_config::Config;
use serde::Serialize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Non-secret facts about the running service, captured once at startup
#[derive(Debug)]
pub struct ServiceInfo {
    name: String,
    capabilities: String,
    provider: Option<ProviderSummary>,
}

#[derive(Debug)]
struct ProviderSummary {
    provider_type: &'static str,
    deployment: String,
    api_version: String,
    endpoint_host: Option<String>,
}

impl ServiceInfo {
    pub fn from_config(config: &Config) -> Arc<Self> {
        let provider = config.active_provider().map(|p| ProviderSummary {
            provider_type: p.provider_type.as_str(),
            deployment: p.deployment.clone(),
            api_version: p.api_version.clone(),
            endpoint_host: p.endpoint.host_str().map(str::to_owned),
        });

        Arc::new(Self {
            name: config.service.name.clone(),
            capabilities: config.service.capabilities.clone(),
            provider,
        })
    }
}

#[derive(Serialize)]
struct HealthBody<'a> {
    status: &'static str,
    service: &'a str,
    version: &'static str,
}

#[derive(Serialize)]
struct InfoBody<'a> {
    service: &'a str,
    version: &'static str,
    deployment: Option<&'a str>,
    status: &'static str,
    capabilities: &'a str,
}

#[derive(Serialize)]
struct DebugBody<'a> {
    service: &'a str,
    version: &'static str,
    relay_enabled: bool,
    provider: Option<&'static str>,
    deployment: Option<&'a str>,
    api_version: Option<&'a str>,
    endpoint_host: Option<&'a str>,
}

/// Health check handler
pub async fn health_handler(State(info): State<Arc<ServiceInfo>>) -> impl IntoResponse {
    Json(HealthBody {
        status: "healthy",
        service: &info.name,
        version: VERSION,
    })
    .into_response()
}

/// Static service metadata
pub async fn info_handler(State(info): State<Arc<ServiceInfo>>) -> impl IntoResponse {
    Json(InfoBody {
        service: &info.name,
        version: VERSION,
        deployment: info.provider.as_ref().map(|p| p.deployment.as_str()),
        status: "operational",
        capabilities: &info.capabilities,
    })
    .into_response()
}

/// Runtime diagnostics
///
/// Reports provider selection only. Credentials, their presence, and the
/// filesystem are never exposed.
pub async fn debug_handler(State(info): State<Arc<ServiceInfo>>) -> impl IntoResponse {
    let provider = info.provider.as_ref();

    Json(DebugBody {
        service: &info.name,
        version: VERSION,
        relay_enabled: provider.is_some(),
        provider: provider.map(|p| p.provider_type),
        deployment: provider.map(|p| p.deployment.as_str()),
        api_version: provider.map(|p| p.api_version.as_str()),
        endpoint_host: provider.and_then(|p| p.endpoint_host.as_deref()),
    })
    .into_response()
}
