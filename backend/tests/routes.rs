use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use backend::BackendConfig;
use futures::StreamExt;
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

async fn router() -> Router {
    backend::init(Router::new(), BackendConfig::default())
        .await
        .unwrap()
}

async fn post(router: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn message_route_replies_with_envelope() {
    let (status, body) = post(
        router().await,
        "/api/message",
        json!({ "type": "GET_SETTINGS" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reply: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["ok"], json!(true));
    assert_eq!(reply["data"]["model"], json!("models/gemini-1.5-pro-latest"));
}

#[tokio::test]
async fn garbage_body_still_gets_a_reply() {
    let (status, body) = post(router().await, "/api/message", "{{{").await;

    assert_eq!(status, StatusCode::OK);
    let reply: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["ok"], json!(false));
    assert!(reply["error"].as_str().unwrap().starts_with("Malformed message"));
}

#[tokio::test]
async fn unknown_tag_over_http() {
    let (_, body) = post(
        router().await,
        "/api/message",
        json!({ "type": "NOPE" }).to_string(),
    )
    .await;
    let reply: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply, json!({ "ok": false, "error": "Unknown message type" }));
}

#[tokio::test]
async fn triggers_are_accepted_without_reply() {
    let app = router().await;
    let (status, _) = post(
        app.clone(),
        "/api/triggers/context-menu",
        json!({ "menuItemId": "gemini_summarize_selection", "tabId": 1 }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = post(app, "/api/triggers/action", json!({ "tabId": 1 }).to_string()).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

/// Reads the next `data:` frame from an event-stream body
async fn next_event<S>(stream: &mut S, buffer: &mut String) -> Value
where
    S: futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
{
    loop {
        if let Some(end) = buffer.find("\n\n") {
            let frame: String = buffer.drain(..end + 2).collect();
            let data = frame.trim().strip_prefix("data: ").unwrap().to_string();
            return serde_json::from_str(&data).unwrap();
        }
        let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("no event within timeout")
            .unwrap()
            .unwrap();
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());
    }
}

#[tokio::test]
async fn event_stream_carries_install_and_trigger_pushes() {
    let app = router().await;
    let response = app
        .clone()
        .oneshot(Request::get("/api/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    let mut stream = response.into_body().into_data_stream();
    let mut buffer = String::new();

    let (status, _) = post(app.clone(), "/api/install", Body::empty()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let registered = next_event(&mut stream, &mut buffer).await;
    assert_eq!(registered["event"], json!("menus_registered"));
    assert_eq!(registered["items"].as_array().unwrap().len(), 4);

    let (status, _) = post(
        app,
        "/api/triggers/context-menu",
        json!({ "menuItemId": "gemini_summarize_selection", "tabId": 5 }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let pushed = next_event(&mut stream, &mut buffer).await;
    assert_eq!(
        pushed,
        json!({
            "event": "notify",
            "tab_id": 5,
            "notification": { "type": "SHOW_SEARCH_BOX", "preset": "summarize" }
        })
    );
}
