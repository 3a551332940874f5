#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, unreachable_pub)]
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use common::{Behavior, RecordingTransport, TestApp, valid_submission};
use contact_relay::adapters::mail::resend::ResendTransport;
use contact_relay::adapters::mail::{MailTransport, TransportError};
use contact_relay::domain::notification::NotificationMessage;
use std::sync::{Arc, Mutex};
use std::time::Duration;
mod common;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>,
}

#[derive(Clone)]
struct MockState {
    captured: Captured,
    status: StatusCode,
    delay: Duration,
}

async fn emails(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
    state.captured.requests.lock().unwrap().push((auth, body));

    tokio::time::sleep(state.delay).await;

    if state.status.is_success() {
        (state.status, Json(serde_json::json!({ "id": "4ef9a417-02e9-4d39-ad75-9611e0fcc33c" })))
    } else {
        (state.status, Json(serde_json::json!({ "name": "validation_error", "message": "domain is not verified" })))
    }
}

/// Serves a stand-in for the email API and returns its URL.
async fn spawn_mock_api(status: StatusCode, delay: Duration) -> (String, Captured) {
    let captured = Captured::default();
    let state = MockState { captured: captured.clone(), status, delay };
    let router = Router::new().route("/emails", post(emails)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/emails", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (url, captured)
}

fn transport(api_url: &str, timeout_ms: u64) -> ResendTransport {
    let mut config = common::get_test_config();
    config.resend.resend_api_url = api_url.to_string();
    config.resend.resend_timeout_ms = timeout_ms;
    ResendTransport::from_config(&config.resend, &config.mail).unwrap().unwrap()
}

fn message() -> NotificationMessage {
    NotificationMessage {
        to: "owner@example.com".to_string(),
        reply_to: "taro@acme.co".to_string(),
        subject: "【AI House Dev】新しいお問い合わせ - Acme Co様".to_string(),
        body: "新しいお問い合わせが届きました。".to_string(),
    }
}

#[tokio::test]
async fn test_sends_bearer_authenticated_payload() {
    let (url, captured) = spawn_mock_api(StatusCode::OK, Duration::ZERO).await;

    transport(&url, 2000).send(&message()).await.unwrap();

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer re_test_key"));
    assert_eq!(body["from"], "AI House Dev <noreply@aihousedev.com>");
    assert_eq!(body["to"], serde_json::json!(["owner@example.com"]));
    assert_eq!(body["reply_to"], "taro@acme.co");
    assert_eq!(body["subject"], "【AI House Dev】新しいお問い合わせ - Acme Co様");
    assert_eq!(body["text"], "新しいお問い合わせが届きました。");
}

#[tokio::test]
async fn test_non_success_status_is_rejected() {
    let (url, _captured) = spawn_mock_api(StatusCode::FORBIDDEN, Duration::ZERO).await;

    let err = transport(&url, 2000).send(&message()).await.unwrap_err();

    match err {
        TransportError::Rejected { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("domain is not verified"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_api_times_out() {
    let (url, _captured) = spawn_mock_api(StatusCode::OK, Duration::from_secs(5)).await;

    let started = std::time::Instant::now();
    let result = transport(&url, 200).send(&message()).await;

    assert!(matches!(result, Err(TransportError::Other(_))));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_rejected_api_falls_back_end_to_end() {
    let (url, captured) = spawn_mock_api(StatusCode::UNAUTHORIZED, Duration::ZERO).await;

    let mut config = common::get_test_config();
    config.resend.resend_api_url = url;
    let fallback = RecordingTransport::new(Behavior::Succeed);

    // Primary is the real HTTP adapter here; only the relay is replaced.
    let app = TestApp::spawn_with(config, None, Some(fallback.clone())).await;
    let resp = app.post_contact(&valid_submission()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(captured.requests.lock().unwrap().len(), 1);
    assert_eq!(fallback.calls(), 1);
}
