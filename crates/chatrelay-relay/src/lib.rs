//! Completion relay for chatrelay
//!
//! Validates a single chat message, wraps it in a fixed system + user prompt,
//! forwards it to the configured completion provider (Azure `OpenAI` or an
//! OpenAI-compatible API) and normalizes the answer into a success or error
//! envelope.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
#[cfg(feature = "http")]
mod handler;
mod metrics;
pub mod protocol;
pub mod provider;
mod relay;
pub mod types;

pub use error::RelayError;
#[cfg(feature = "http")]
pub use handler::chat_router;
pub use provider::{CompletionProvider, build_provider};
pub use relay::{Relay, RelayOutcome, RelaySettings, parse_chat_request};
pub use types::{ChatRequest, CompletionParams, CompletionRequest, CompletionResult, Message, PromptEnvelope, Role};
