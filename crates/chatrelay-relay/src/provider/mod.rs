//! Provider trait and implementations for completion backends

pub mod azure;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatrelay_config::{ProviderConfig, ProviderType};
use reqwest::{Client, RequestBuilder};

use crate::error::RelayError;
use crate::protocol::ChatCompletionResponse;
use crate::types::{CompletionRequest, CompletionResult};

/// Trait implemented by each completion backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Send one chat completion request and return the first choice
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, RelayError>;
}

/// Build the provider selected by configuration
///
/// # Errors
///
/// Returns an error if the timeout is malformed or the HTTP client cannot be built
pub fn build_provider(config: &ProviderConfig) -> anyhow::Result<Arc<dyn CompletionProvider>> {
    let client = http_client(config.timeout()?)?;

    Ok(match config.provider_type {
        ProviderType::AzureOpenai => Arc::new(azure::AzureOpenAiProvider::new(client, config)),
        ProviderType::Openai => Arc::new(openai::OpenAiProvider::new(client, config)),
    })
}

/// HTTP client shared by all requests to one provider
fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))
}

/// Longest provider error body kept for logging
const MAX_ERROR_BODY_BYTES: usize = 512;

/// Cut an upstream error body to [`MAX_ERROR_BODY_BYTES`] on a char boundary
fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

/// Send a prepared request and decode the first choice
async fn send(provider: &str, builder: RequestBuilder) -> Result<CompletionResult, RelayError> {
    let response = builder.send().await.map_err(|e| {
        tracing::debug!(provider, timeout = e.is_timeout(), "upstream request failed");
        RelayError::Upstream(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(provider, %status, body_len = body.len(), "upstream returned error");
        return Err(RelayError::UpstreamStatus {
            status,
            body: truncate_body(body),
        });
    }

    let wire_response: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| RelayError::MalformedResponse(format!("failed to parse response: {e}")))?;

    wire_response.try_into()
}
