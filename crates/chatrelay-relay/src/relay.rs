//! Request validation and the single upstream round trip

use std::sync::Arc;
use std::time::{Duration, Instant};

use chatrelay_config::{ProviderConfig, RelayConfig};
use chatrelay_core::{ChatResponse, HttpError};
use http::StatusCode;

use crate::error::RelayError;
use crate::metrics::RelayMetrics;
use crate::provider::{CompletionProvider, build_provider};
use crate::types::{ChatRequest, CompletionParams, CompletionRequest, CompletionResult, PromptEnvelope};

/// Terminal outcome of one chat request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    ValidationRejected,
    ProviderFailure,
    Success,
}

impl RelayOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationRejected => "validation_rejected",
            Self::ProviderFailure => "provider_failure",
            Self::Success => "success",
        }
    }
}

/// Immutable per-process relay settings
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Deployment name or model identifier sent with every call
    pub deployment: String,
    /// System message content
    pub system_instruction: String,
    pub params: CompletionParams,
    /// Upper bound on one provider call
    pub timeout: Duration,
}

impl RelaySettings {
    /// Derive settings from validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider timeout is malformed
    pub fn from_config(provider: &ProviderConfig, relay: &RelayConfig) -> anyhow::Result<Self> {
        Ok(Self {
            deployment: provider.deployment.clone(),
            system_instruction: relay.system_instruction().to_owned(),
            params: CompletionParams {
                max_tokens: relay.max_tokens,
                temperature: relay.temperature,
                top_p: relay.top_p,
            },
            timeout: provider.timeout()?,
        })
    }
}

/// Shared state for the chat route
#[derive(Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

struct RelayInner {
    provider: Arc<dyn CompletionProvider>,
    settings: RelaySettings,
    metrics: RelayMetrics,
}

impl Relay {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: RelaySettings) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                provider,
                settings,
                metrics: RelayMetrics::new(),
            }),
        }
    }

    /// Build the relay and its provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be constructed
    pub fn from_config(provider: &ProviderConfig, relay: &RelayConfig) -> anyhow::Result<Self> {
        let settings = RelaySettings::from_config(provider, relay)?;
        Ok(Self::new(build_provider(provider)?, settings))
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.inner.settings
    }

    /// Validate a raw request, relay it and produce the response envelope
    ///
    /// Never fails: every error is mapped to a status code and a
    /// client-safe body. Provider error detail is only logged.
    pub async fn handle(&self, content_type: Option<&str>, body: &[u8]) -> (StatusCode, ChatResponse) {
        let request = match parse_chat_request(content_type, body) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "rejected chat request");
                self.inner.metrics.record_outcome(RelayOutcome::ValidationRejected);
                return (e.status_code(), ChatResponse::from_error(&e));
            }
        };

        tracing::info!(question = %request.message, "chat request");

        match self.complete(&request).await {
            Ok(result) => {
                tracing::info!(answer = %result.text, tokens_used = ?result.tokens_used, "chat response");
                self.inner.metrics.record_outcome(RelayOutcome::Success);
                (StatusCode::OK, ChatResponse::success(result.text, result.tokens_used))
            }
            Err(e) => {
                tracing::error!(
                    provider = self.inner.provider.name(),
                    error = %e,
                    error_type = e.error_type(),
                    "chat completion failed"
                );
                self.inner.metrics.record_outcome(RelayOutcome::ProviderFailure);
                (e.status_code(), ChatResponse::from_error(&e))
            }
        }
    }

    /// Send one validated request upstream and trim the answer
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails, answers malformed, or does
    /// not answer within the configured timeout
    pub async fn complete(&self, request: &ChatRequest) -> Result<CompletionResult, RelayError> {
        let settings = &self.inner.settings;
        let provider = &self.inner.provider;

        let completion_request = CompletionRequest {
            deployment: settings.deployment.clone(),
            prompt: PromptEnvelope::new(&settings.system_instruction, request),
            params: settings.params,
        };

        let start = Instant::now();
        let result = tokio::time::timeout(settings.timeout, provider.complete(&completion_request))
            .await
            .unwrap_or_else(|_| Err(RelayError::Timeout(settings.timeout)));

        let result = result.map(|r| CompletionResult {
            text: r.text.trim().to_owned(),
            tokens_used: r.tokens_used,
        });

        self.inner.metrics.record_round_trip(
            provider.name(),
            start,
            result.as_ref().ok().and_then(|r| r.tokens_used),
        );

        result
    }
}

/// Validate a raw `/api/chat` body
///
/// The body must be declared as JSON and parse as a JSON object; `message`
/// must then be a string that is non-empty once trimmed.
///
/// # Errors
///
/// Returns [`RelayError::InvalidContentType`] or [`RelayError::EmptyMessage`]
pub fn parse_chat_request(content_type: Option<&str>, body: &[u8]) -> Result<ChatRequest, RelayError> {
    if !content_type.is_some_and(is_json_content_type) {
        return Err(RelayError::InvalidContentType);
    }

    let serde_json::Value::Object(fields) =
        serde_json::from_slice::<serde_json::Value>(body).map_err(|_| RelayError::InvalidContentType)?
    else {
        return Err(RelayError::InvalidContentType);
    };

    let message = fields
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(RelayError::EmptyMessage)?;

    Ok(ChatRequest {
        message: message.to_owned(),
    })
}

/// `application/json` or any `+json` structured syntax suffix
fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}
