//! Per-request values flowing through the relay
//!
//! None of these outlive a single request/response cycle.

use serde::{Deserialize, Serialize};

/// Role of a prompt message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Policy instruction
    System,
    /// End-user content
    User,
}

/// Role-tagged prompt message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Validated chat request; `message` is already trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

/// The system + user message pair sent to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEnvelope {
    system: Message,
    user: Message,
}

impl PromptEnvelope {
    pub fn new(system_instruction: &str, request: &ChatRequest) -> Self {
        Self {
            system: Message {
                role: Role::System,
                content: system_instruction.to_owned(),
            },
            user: Message {
                role: Role::User,
                content: request.message.clone(),
            },
        }
    }

    /// Messages in send order: system first, then user
    pub fn messages(&self) -> [&Message; 2] {
        [&self.system, &self.user]
    }
}

/// Sampling parameters for a completion call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    /// Cap on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling probability
    pub top_p: f64,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 120,
            temperature: 0.6,
            top_p: 0.9,
        }
    }
}

/// Everything a provider needs for one completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Deployment name or model identifier
    pub deployment: String,
    pub prompt: PromptEnvelope,
    pub params: CompletionParams,
}

/// Text extracted from the provider's first choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub text: String,
    /// Total tokens reported by the provider, if any
    pub tokens_used: Option<u32>,
}
