//! Azure `OpenAI` deployment provider

use async_trait::async_trait;
use chatrelay_config::ProviderConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::CompletionProvider;
use crate::error::RelayError;
use crate::protocol::ChatCompletionRequest;
use crate::types::{CompletionRequest, CompletionResult};

/// Azure `OpenAI` provider
///
/// Targets `{endpoint}/openai/deployments/{deployment}/chat/completions` and
/// authenticates with the `api-key` header.
pub struct AzureOpenAiProvider {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
    api_version: String,
}

impl AzureOpenAiProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
        }
    }

    /// Build the chat completions URL for a deployment
    fn completions_url(&self, deployment: &str) -> Result<Url, RelayError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("provider endpoint cannot be a base URL: {}", self.endpoint))?
            .pop_if_empty()
            .extend(["openai", "deployments", deployment, "chat", "completions"]);
        url.query_pairs_mut().append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

#[async_trait]
impl CompletionProvider for AzureOpenAiProvider {
    fn name(&self) -> &str {
        "azure_openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, RelayError> {
        // The deployment in the URL selects the model
        let wire_request = ChatCompletionRequest {
            model: None,
            ..ChatCompletionRequest::from(request)
        };

        let builder = self
            .client
            .post(self.completions_url(&request.deployment)?)
            .header("api-key", self.api_key.expose_secret())
            .json(&wire_request);

        super::send(self.name(), builder).await
    }
}
