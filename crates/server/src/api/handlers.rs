use crate::config::AppState;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;

/// Handle one JSON-RPC message
///
/// JSON-RPC failures still travel as `200 OK`; only notifications, which
/// get no reply, are answered with `202 Accepted`.
pub async fn mcp_post(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Open the notification stream
pub async fn mcp_sse(State(state): State<Arc<AppState>>) -> Response {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let stream = state
        .mcp
        .open_notifications(connection_id, state.shutdown.child_token())
        .map(Ok::<_, Infallible>);

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "coursegate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
