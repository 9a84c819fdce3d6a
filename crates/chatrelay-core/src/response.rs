use serde::{Deserialize, Serialize};

use crate::HttpError;

/// Outcome marker carried by every response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Normalized body returned by `/api/chat` and the JSON error handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    /// Completion text relayed from the provider
    Success {
        response: String,
        status: ResponseStatus,
        /// Total tokens reported by the provider, `null` when not reported
        tokens_used: Option<u32>,
    },
    /// Client-safe failure description
    Error { error: String, status: ResponseStatus },
}

impl ChatResponse {
    pub const fn success(response: String, tokens_used: Option<u32>) -> Self {
        Self::Success {
            response,
            status: ResponseStatus::Success,
            tokens_used,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
            status: ResponseStatus::Error,
        }
    }

    /// Build an error envelope from a domain error's client message
    pub fn from_error(error: &impl HttpError) -> Self {
        Self::error(error.client_message())
    }

    pub const fn status(&self) -> ResponseStatus {
        match self {
            Self::Success { status, .. } | Self::Error { status, .. } => *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_null_usage() {
        let body = serde_json::to_value(ChatResponse::success("hi".to_owned(), None)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"response": "hi", "status": "success", "tokens_used": null})
        );
    }

    #[test]
    fn error_has_no_response_field() {
        let body = serde_json::to_value(ChatResponse::error("message cannot be empty")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "message cannot be empty", "status": "error"})
        );
    }

    #[test]
    fn envelopes_deserialize_by_shape() {
        let ok: ChatResponse =
            serde_json::from_str(r#"{"response":"a","status":"success","tokens_used":7}"#).unwrap();
        assert_eq!(ok, ChatResponse::success("a".to_owned(), Some(7)));

        let err: ChatResponse = serde_json::from_str(r#"{"error":"x","status":"error"}"#).unwrap();
        assert_eq!(err.status(), ResponseStatus::Error);
    }
}
