//! Mock LLM backend server for integration tests
//!
//! Serves both the Azure `OpenAI` deployment route and the OpenAI-compatible
//! route, returning canned completions and recording what it received

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// How the mock answers completion requests
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Reply with the given content, optionally reporting token usage
    Reply { content: String, usage: bool },
    /// Fail every request with a 500 carrying a sensitive-looking body
    Fail,
    /// Reply after sleeping for the given duration
    Delay(Duration),
    /// Reply with an empty `choices` array
    NoChoices,
}

/// A completion request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Deployment from the Azure route, `None` for the OpenAI-compatible route
    pub deployment: Option<String>,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

/// Text returned in failure bodies; must never reach relay clients
pub const FAILURE_DETAIL: &str = "upstream exploded: secret-internal-trace-1234";

/// Mock LLM backend that returns predictable responses
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

struct MockLlmState {
    behavior: Behavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockLlm {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with_response("Hello from mock LLM").await
    }

    /// Start a mock server that answers with custom content
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        Self::start_with(Behavior::Reply {
            content: content.to_owned(),
            usage: true,
        })
        .await
    }

    /// Start a mock server that fails every request with 500
    pub async fn start_failing() -> anyhow::Result<Self> {
        Self::start_with(Behavior::Fail).await
    }

    /// Start a mock server with the given behavior
    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(
                "/openai/deployments/{deployment}/chat/completions",
                routing::post(handle_azure_completions),
            )
            .route("/v1/chat/completions", routing::post(handle_openai_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Endpoint for configuring the mock as an Azure `OpenAI` resource
    pub fn azure_endpoint(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Base URL for configuring the mock as an OpenAI-compatible provider
    ///
    /// Includes `/v1` since the provider appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Most recent completion request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.lock().unwrap().last().cloned()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn handle_azure_completions(
    State(state): State<Arc<MockLlmState>>,
    Path(deployment): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let model = deployment.clone();
    record(&state, Some(deployment), query, &headers, body);
    respond(&state, &model).await
}

async fn handle_openai_completions(
    State(state): State<Arc<MockLlmState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let model = body["model"].as_str().unwrap_or("mock-model").to_owned();
    record(&state, None, query, &headers, body);
    respond(&state, &model).await
}

fn record(
    state: &MockLlmState,
    deployment: Option<String>,
    query: Option<String>,
    headers: &HeaderMap,
    body: serde_json::Value,
) {
    state.requests.lock().unwrap().push(RecordedRequest {
        deployment,
        query,
        api_key: header(headers, "api-key"),
        authorization: header(headers, "authorization"),
        body,
    });
}

async fn respond(state: &MockLlmState, model: &str) -> axum::response::Response {
    let (content, usage) = match &state.behavior {
        Behavior::Reply { content, usage } => (content.as_str(), *usage),
        Behavior::Fail => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": {
                        "message": FAILURE_DETAIL,
                        "type": "server_error"
                    }
                })),
            )
                .into_response();
        }
        Behavior::Delay(delay) => {
            tokio::time::sleep(*delay).await;
            ("Hello from mock LLM", true)
        }
        Behavior::NoChoices => {
            return Json(serde_json::json!({
                "id": "chatcmpl-test-123",
                "object": "chat.completion",
                "model": model,
                "choices": []
            }))
            .into_response();
        }
    };

    let mut response = serde_json::json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    });

    if usage {
        response["usage"] = serde_json::json!({
            "prompt_tokens": 30,
            "completion_tokens": 12,
            "total_tokens": 42
        });
    }

    Json(response).into_response()
}
