use crate::AppState;
use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use shared::models::{ActionClick, ContextMenuClick, Reply};
use tokio::sync::broadcast::error::RecvError;

/// Request/reply channel. Always answers 200 with a `Reply`, including for
/// bodies that are not JSON at all.
pub async fn handle_message(State(state): State<AppState>, body: Bytes) -> Json<Reply> {
    let message = match serde_json::from_slice::<Value>(&body) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Rejected unparseable message: {}", e);
            return Json(Reply::error(format!("Malformed message: {}", e)));
        }
    };
    Json(state.coordinator.handle(message).await)
}

pub async fn context_menu_clicked(
    State(state): State<AppState>,
    Json(click): Json<ContextMenuClick>,
) -> StatusCode {
    tokio::spawn(async move { state.coordinator.on_context_menu(click).await });
    StatusCode::ACCEPTED
}

pub async fn action_clicked(
    State(state): State<AppState>,
    Json(click): Json<ActionClick>,
) -> StatusCode {
    tokio::spawn(async move { state.coordinator.on_action_clicked(click).await });
    StatusCode::ACCEPTED
}

pub async fn install(State(state): State<AppState>) -> StatusCode {
    match state.coordinator.install().await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("Failed to register context menus: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Server-sent stream of host events for attached page surfaces
pub async fn events(State(state): State<AppState>) -> Response {
    let mut receiver = state.host.subscribe();

    let body = Body::from_stream(async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        yield Ok::<String, std::io::Error>(format!("data: {}\n\n", json));
                    }
                    Err(e) => tracing::error!("Failed to encode host event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event subscriber lagged, {} event(s) dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}
