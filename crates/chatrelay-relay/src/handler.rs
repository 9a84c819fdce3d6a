//! Axum route for `POST /api/chat`

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};

use crate::relay::Relay;

/// Build the chat router
pub fn chat_router(relay: Relay) -> Router {
    Router::new()
        .route("/api/chat", routing::post(chat))
        .with_state(relay)
}

/// Handle `POST /api/chat`
///
/// Takes the raw body so that malformed JSON and wrong content types map to
/// the relay's own error envelope instead of axum's rejections.
async fn chat(State(relay): State<Relay>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let (status, envelope) = relay.handle(content_type, &body).await;

    (status, Json(envelope)).into_response()
}
