//! End-to-end tests of the HTTP API with stubbed loader and model.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use url_summarizer::Session;
use url_summarizer::loader::{ContentLoader, Document, LoadError, SourceKind};
use url_summarizer::server::{self, AppState};
use url_summarizer::summarize::{ModelProvider, SummarizeResult, SummaryModel};

struct FixedLoader {
    text: &'static str,
    clears: AtomicUsize,
}

impl FixedLoader {
    const fn new(text: &'static str) -> Self {
        Self {
            text,
            clears: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentLoader for FixedLoader {
    async fn load(&self, url: &str, kind: SourceKind) -> Result<Vec<Document>, LoadError> {
        match self.text {
            "fail" => Err(LoadError::TranscriptsDisabled("dQw4w9WgXcQ".to_string())),
            "down" => Err(LoadError::HttpStatus {
                url: url.to_string(),
                status: 503,
            }),
            text => Ok(vec![Document::new(text, url, kind)]),
        }
    }

    fn clear_cache(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

struct FixedModel {
    reply: &'static str,
}

#[async_trait]
impl SummaryModel for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn complete(&self, _prompt: &str) -> SummarizeResult<String> {
        Ok(self.reply.to_string())
    }
}

struct FixedProvider {
    reply: &'static str,
}

impl ModelProvider for FixedProvider {
    fn model_name(&self) -> &str {
        "fixed"
    }

    fn model_for(&self, _api_key: &str) -> SummarizeResult<Box<dyn SummaryModel>> {
        Ok(Box::new(FixedModel { reply: self.reply }))
    }
}

fn app_with_loader(loader: Arc<FixedLoader>, reply: &'static str, api_key: Option<&str>) -> Router {
    let state = AppState::with_backends(
        loader,
        Arc::new(FixedProvider { reply }),
        Session::with_api_key(api_key),
    );
    server::app(state)
}

fn app_with(text: &'static str, reply: &'static str, api_key: Option<&str>) -> Router {
    app_with_loader(Arc::new(FixedLoader::new(text)), reply, api_key)
}

fn app() -> Router {
    app_with("Some article text to summarize.", "Short summary.", Some("gsk_test"))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "fixed");
}

#[tokio::test]
async fn test_session_never_exposes_key() {
    let (status, body) = send(&app(), Method::GET, "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_api_key"], true);
    assert!(!body.to_string().contains("gsk_test"));
}

#[tokio::test]
async fn test_set_api_key() {
    let app = app_with("text", "summary", None);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/session/key",
        Some(json!({ "api_key": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide the Groq API key to proceed.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/session/key",
        Some(json!({ "api_key": "gsk_new" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_api_key"], true);
}

#[tokio::test]
async fn test_summarize_success_records_history() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "https://youtu.be/dQw4w9WgXcQ" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Short summary.");
    assert_eq!(body["kind"], "video");
    assert_eq!(
        body["normalized_url"],
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
    );
    assert_eq!(body["notes"][2], "Retrieved 1 documents.");
    assert_eq!(body["history"][0]["url"], "https://youtu.be/dQw4w9WgXcQ");
    assert_eq!(body["history"][0]["summary"], "Short summary.");

    let (_, history) = send(&app, Method::GET, "/api/history", None).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_summarize_validation_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide the URL to get started");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "not a url" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Please enter a valid URL. It can be a YT video URL or website URL"
    );

    let (_, history) = send(&app, Method::GET, "/api/history", None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_summarize_without_key() {
    let app = app_with("text", "summary", None);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "https://example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide the Groq API key to proceed.");
}

#[tokio::test]
async fn test_summarize_blank_content() {
    let app = app_with("  \n ", "summary", Some("gsk_test"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "https://example.com/empty" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "Unable to retrieve content from the provided URL."
    );

    let (_, history) = send(&app, Method::GET, "/api/history", None).await;
    assert_eq!(history[0]["url"], "https://example.com/empty");
    assert_eq!(history[0]["summary"], "");
}

#[tokio::test]
async fn test_summarize_unusable_content() {
    let app = app_with("fail", "summary", Some("gsk_test"));
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "Exception: Transcripts are disabled for video dQw4w9WgXcQ"
    );
}

#[tokio::test]
async fn test_summarize_remote_failures() {
    let app = app_with("down", "summary", Some("gsk_test"));
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "https://example.com/page" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "Exception: https://example.com/page returned HTTP status 503"
    );

    let app = app_with("text", "   ", Some("gsk_test"));
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "https://example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Exception: ")));
}

#[tokio::test]
async fn test_clear_history_and_reset() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/api/summarize",
        Some(json!({ "url": "https://example.com" })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/api/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"], json!([]));
    assert_eq!(body["has_api_key"], true);

    let (status, body) = send(&app, Method::DELETE, "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_api_key"], false);
}

#[tokio::test]
async fn test_reset_clears_loader_cache() {
    let loader = Arc::new(FixedLoader::new("text"));
    let app = app_with_loader(Arc::clone(&loader), "summary", Some("gsk_test"));

    send(&app, Method::DELETE, "/api/history", None).await;
    assert_eq!(loader.clears.load(Ordering::SeqCst), 0);

    let (status, _) = send(&app, Method::DELETE, "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loader.clears.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cross_origin_requests_get_no_cors_grant() {
    let app = app();

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/session")
        .header("origin", "https://evil.example")
        .header("access-control-request-method", "DELETE")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
    assert!(response.headers().get("access-control-allow-methods").is_none());

    let read = Request::builder()
        .uri("/api/session")
        .header("origin", "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(read).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_summarize_requires_json_body() {
    let app = app();

    // A plain form post, which browsers send cross-site without a preflight.
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/summarize")
        .header("origin", "https://evil.example")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"url":"https://example.com"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (_, history) = send(&app, Method::GET, "/api/history", None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_index_page_is_served() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8_lossy(&bytes);
    assert!(page.contains("Summarize URL"));
}
