use axum::Json;
use axum::response::{Html, IntoResponse};
use chatrelay_core::ChatResponse;
use http::{StatusCode, Uri};

/// Browser chat page
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// JSON body for unknown routes
pub async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    tracing::warn!(%uri, "route not found");
    (StatusCode::NOT_FOUND, Json(ChatResponse::error("endpoint not found")))
}
