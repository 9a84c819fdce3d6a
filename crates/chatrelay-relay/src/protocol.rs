//! Chat completions wire format shared by Azure `OpenAI` and OpenAI-compatible APIs

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::types::{CompletionRequest, CompletionResult, Message};

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier; Azure selects the model through the URL instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    /// Prompt messages
    pub messages: [&'a Message; 2],
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: Some(&request.deployment),
            messages: request.prompt.messages(),
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
        }
    }
}

/// Chat completion response body
///
/// Only the fields the relay reads are modeled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Choice within a response
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Message within a response choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Text content; `null` when the provider filtered the output
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Absent on some OpenAI-compatible servers even when `usage` is sent
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

impl TryFrom<ChatCompletionResponse> for CompletionResult {
    type Error = RelayError;

    fn try_from(response: ChatCompletionResponse) -> Result<Self, Self::Error> {
        let first = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RelayError::MalformedResponse("response contained no choices".to_owned()))?;

        let text = first
            .message
            .content
            .ok_or_else(|| RelayError::MalformedResponse("first choice has no content".to_owned()))?;

        Ok(Self {
            text,
            tokens_used: response.usage.and_then(|u| u.total_tokens),
        })
    }
}
