use std::time::Duration;

use chatrelay_core::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Message returned to callers for every provider-side failure
pub const INTERNAL_SERVICE_ERROR: &str = "internal service error";

/// Errors that can occur while relaying a chat message
#[derive(Debug, Error)]
pub enum RelayError {
    /// Body is not a JSON object or was not declared as JSON
    #[error("Content-Type must be application/json")]
    InvalidContentType,

    /// `message` is missing, not a string, or blank
    #[error("message cannot be empty")]
    EmptyMessage,

    /// Transport-level failure talking to the provider
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// Provider did not answer in time
    #[error("provider did not respond within {0:?}")]
    Timeout(Duration),

    /// Provider answered 2xx with a body we cannot use
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    /// Whether the caller sent a bad request, as opposed to a provider fault
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidContentType | Self::EmptyMessage)
    }
}

impl HttpError for RelayError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidContentType | Self::EmptyMessage => "invalid_request_error",
            Self::Upstream(_) | Self::UpstreamStatus { .. } => "upstream_error",
            Self::Timeout(_) => "timeout_error",
            Self::MalformedResponse(_) => "malformed_response_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            INTERNAL_SERVICE_ERROR.to_owned()
        }
    }
}
