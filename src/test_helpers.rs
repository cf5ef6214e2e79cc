//! Shared test fixtures: a local stand-in for the provider endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;

use crate::config::ApiConfig;

/// One request received by the fake provider.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub api_key: Option<String>,
    pub api_version: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct FakeProvider {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Handle to a running fake provider.
pub struct FakeEndpoint {
    pub url: String,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeEndpoint {
    /// Config pointing at this endpoint in real mode with a test key.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            use_real_api: true,
            endpoint: self.url.clone(),
            api_key: "sk-test".into(),
            ..ApiConfig::default()
        }
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle_messages(State(fake): State<FakeProvider>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    fake.requests.lock().unwrap().push(CapturedRequest {
        api_key: header(&headers, "x-api-key"),
        api_version: header(&headers, "anthropic-version"),
        content_type: header(&headers, "content-type"),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    });
    if !fake.delay.is_zero() {
        tokio::time::sleep(fake.delay).await;
    }
    (fake.status, fake.body.clone())
}

/// Start a fake `/v1/messages` endpoint answering every call with `status`/`body`.
pub async fn spawn_fake_provider(status: u16, body: impl Into<String>) -> FakeEndpoint {
    spawn_fake_provider_with_delay(status, body, Duration::ZERO).await
}

/// Like [`spawn_fake_provider`] but waits `delay` before answering.
pub async fn spawn_fake_provider_with_delay(status: u16, body: impl Into<String>, delay: Duration) -> FakeEndpoint {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeProvider {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.into(),
        delay,
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/v1/messages", post(handle_messages))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeEndpoint { url: format!("http://{addr}/v1/messages"), requests }
}

/// Provider success body whose first text block is `text`.
pub fn provider_body(text: &str) -> String {
    serde_json::json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "model": "claude-3-7-sonnet-20250219",
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 100, "output_tokens": 50 }
    })
    .to_string()
}
