//! Integration tests for POST /generate against a scripted stub
//! upstream chat-completions server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Json, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use axum_test::TestServer;
use serde_json::{Value, json};

use visual_metaphor_api::middleware::rate_limit::FixedWindowLimiter;
use visual_metaphor_api::routes::{self, AppState};
use visual_metaphor_api::services::community_service::CommunityService;
use visual_metaphor_api::services::generation_service::GenerationService;
use visual_metaphor_api::services::openrouter_client::ChatClient;
use visual_metaphor_api::storage::{DocumentStore, InMemoryDocumentStore};

const SVG: &str = r#"<svg width="800" height="800" viewBox="0 0 800 800" xmlns="http://www.w3.org/2000/svg"><circle cx="400" cy="400" r="120"/></svg>"#;
const TITLE_JSON: &str = r#"{"title":"Поток","titleEn":"Flow"}"#;

/// One scripted upstream reply. The script cycles, so repeated
/// requests replay the same call pattern.
#[derive(Clone)]
enum Scripted {
    /// 200 with this message content.
    Content(String),
    /// 200 with an empty choices array (no extractable content).
    EmptyChoices,
    /// This HTTP status with an error body.
    Status(u16),
}

#[derive(Clone)]
struct UpstreamState {
    calls: Arc<AtomicUsize>,
    script: Arc<Vec<Scripted>>,
}

async fn chat_completions(State(state): State<UpstreamState>, Json(_body): Json<Value>) -> Response {
    let n = state.calls.fetch_add(1, Ordering::SeqCst);
    match &state.script[n % state.script.len()] {
        Scripted::Content(content) => Json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
        .into_response(),
        Scripted::EmptyChoices => Json(json!({ "choices": [] })).into_response(),
        Scripted::Status(code) => (
            StatusCode::from_u16(*code).unwrap(),
            Json(json!({"error": {"message": "scripted failure"}})),
        )
            .into_response(),
    }
}

/// Bind a stub chat-completions server on an ephemeral port.
async fn spawn_upstream(script: Vec<Scripted>) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = UpstreamState {
        calls: calls.clone(),
        script: Arc::new(script),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1/chat/completions"), calls)
}

fn app_state(api_url: &str, server_key: Option<&str>, limit: u32) -> AppState {
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    AppState::new(
        GenerationService::new(
            ChatClient::new(api_url),
            "primary-model",
            "fallback-model",
            server_key.map(|k| k.to_string()),
        ),
        CommunityService::new(Some(store)),
        FixedWindowLimiter::new(limit),
    )
}

fn server(state: AppState) -> TestServer {
    TestServer::new(routes::create_api_router().with_state(state)).unwrap()
}

#[tokio::test]
async fn test_end_to_end_generation() {
    let (url, calls) = spawn_upstream(vec![
        Scripted::Content(SVG.to_string()),
        Scripted::Content(TITLE_JSON.to_string()),
    ])
    .await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server
        .post("/generate")
        .json(&json!({
            "text": "Knowledge flowing through neural networks",
            "style": "dark",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["svg"], SVG);
    assert_eq!(body["model"], "primary-model");
    assert_eq!(body["title"], "Поток");
    assert_eq!(body["titleEn"], "Flow");
    assert!(body["elapsed"].as_u64().is_some());
    // One call for the graphic, one for the title.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_extraction_strips_surrounding_prose() {
    let fenced = format!("Here is your metaphor:\n```svg\n{SVG}\n```\nEnjoy!");
    let (url, _calls) = spawn_upstream(vec![
        Scripted::Content(fenced),
        Scripted::Content(TITLE_JSON.to_string()),
    ])
    .await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["svg"], SVG);
}

#[tokio::test]
async fn test_fallback_after_primary_transport_failure() {
    let (url, calls) = spawn_upstream(vec![
        Scripted::Status(500),
        Scripted::Content(SVG.to_string()),
        Scripted::Content(TITLE_JSON.to_string()),
    ])
    .await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["model"], "fallback-model");
    // Two calls for the graphic (primary + fallback), one for the title.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_no_second_attempt_when_already_on_fallback() {
    let (url, calls) = spawn_upstream(vec![Scripted::Status(500)]).await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise", "model": "fallback-model" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "AI service temporarily unavailable");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_both_attempts_failing_yields_bad_gateway() {
    let (url, calls) = spawn_upstream(vec![Scripted::Status(503), Scripted::Status(502)]).await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_title_failure_degrades_gracefully() {
    for title_script in [
        Scripted::Status(500),
        Scripted::Content("no json span here".to_string()),
        Scripted::Content("{not valid json}".to_string()),
    ] {
        let (url, _calls) =
            spawn_upstream(vec![Scripted::Content(SVG.to_string()), title_script]).await;
        let server = server(app_state(&url, Some("test-key"), 10));

        let response = server
            .post("/generate")
            .json(&json!({ "text": "Signal and noise" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["svg"], SVG);
        assert!(body.get("title").is_none());
        assert!(body.get("titleEn").is_none());
    }
}

#[tokio::test]
async fn test_no_svg_in_response_is_terminal() {
    let (url, calls) =
        spawn_upstream(vec![Scripted::Content("I cannot draw that.".to_string())]).await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "AI did not return valid SVG");
    // Not retried and no title call fired.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_content_is_not_retried() {
    let (url, calls) = spawn_upstream(vec![Scripted::EmptyChoices]).await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "No content in AI response");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_text_length_bounds() {
    let (url, calls) = spawn_upstream(vec![
        Scripted::Content(SVG.to_string()),
        Scripted::Content(TITLE_JSON.to_string()),
    ])
    .await;
    let server = server(app_state(&url, Some("test-key"), 100));

    for len in [2, 1001] {
        let response = server
            .post("/generate")
            .json(&json!({ "text": "a".repeat(len) }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
    // Nothing reached the upstream for rejected input.
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    for len in [3, 1000] {
        let response = server
            .post("/generate")
            .json(&json!({ "text": "a".repeat(len) }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_missing_text_is_rejected() {
    let (url, _calls) = spawn_upstream(vec![Scripted::Content(SVG.to_string())]).await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let response = server.post("/generate").json(&json!({ "style": "dark" })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_limit_and_credential_bypass() {
    let (url, _calls) = spawn_upstream(vec![
        Scripted::Content(SVG.to_string()),
        Scripted::Content(TITLE_JSON.to_string()),
    ])
    .await;
    let server = server(app_state(&url, Some("test-key"), 2));

    let body = json!({ "text": "Signal and noise" });
    for _ in 0..2 {
        let response = server.post("/generate").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let denied = server.post("/generate").json(&body).await;
    assert_eq!(denied.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let error: Value = denied.json();
    assert_eq!(error["error"], "Too many requests. Please wait a minute.");

    // A caller-supplied credential is never rate limited.
    let with_key = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise", "apiKey": "sk-user" }))
        .await;
    assert_eq!(with_key.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_server_credential_is_configuration_error() {
    let (url, calls) = spawn_upstream(vec![Scripted::Content(SVG.to_string())]).await;
    let server = server(app_state(&url, None, 10));

    let response = server
        .post("/generate")
        .json(&json!({ "text": "Signal and noise" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Server configuration error");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_method_handling() {
    let (url, _calls) = spawn_upstream(vec![Scripted::Content(SVG.to_string())]).await;
    let server = server(app_state(&url, Some("test-key"), 10));

    let options = server.method(Method::OPTIONS, "/generate").await;
    assert_eq!(options.status_code(), StatusCode::NO_CONTENT);

    let get = server.get("/generate").await;
    assert_eq!(get.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}
