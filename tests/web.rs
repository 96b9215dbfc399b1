//! Integration tests for the web layer.
//!
//! Exercises routing, session cookies, and page rendering against stubbed
//! transcript and embedding providers, so no network access is needed.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use prata::chain::{Chain, ConversationalChain};
use prata::config::{Prompts, Settings};
use prata::embedding::Embedder;
use prata::error::Result;
use prata::index::TranscriptIndex;
use prata::orchestrator::Orchestrator;
use prata::session::ChatTurn;
use prata::transcript::{Transcript, TranscriptLoader};
use prata::web::{app, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

struct StubLoader;

#[async_trait]
impl TranscriptLoader for StubLoader {
    async fn load(&self, _video_url: &str) -> Result<Transcript> {
        Ok(Transcript {
            video_id: "abc123def45".to_string(),
            title: Some("Test Video".to_string()),
            text: "Hello world. This transcript talks about Rust and web servers.".to_string(),
        })
    }
}

struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![text.len() as f32, 1.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::new();
        for t in texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// Canned chain that echoes the question and how much history it was given.
struct StubChain;

#[async_trait]
impl Chain for StubChain {
    async fn run(
        &self,
        _index: &TranscriptIndex,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String> {
        Ok(format!("Answer to {} with {} prior turns", question, history.len()))
    }
}

fn test_app() -> Router {
    let settings = Settings::default();
    let chain = Arc::new(ConversationalChain::new(&settings.chain, Prompts::default()));
    test_app_with_chain(chain)
}

fn test_app_with_chain(chain: Arc<dyn Chain>) -> Router {
    let settings = Settings::default();
    let orchestrator = Arc::new(Orchestrator::with_components(
        settings.clone(),
        Arc::new(StubLoader),
        Arc::new(StubEmbedder),
    ));
    app(AppState::with_components(&settings, orchestrator, chain))
}

fn session_cookie(response: &axum::response::Response) -> String {
    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn home_page_renders_form() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("video_url"));
}

#[tokio::test]
async fn submitting_url_sets_session_and_redirects_to_chat() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(
                    "video_url=https%3A%2F%2Fyoutu.be%2Fabc123def45",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/chat");
    assert!(response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn chat_without_session_redirects_home() {
    let response = test_app()
        .oneshot(Request::builder().uri("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn chat_with_session_renders_video_title() {
    let app = test_app();

    // Submit the URL to obtain a signed session cookie
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(
                    "video_url=https%3A%2F%2Fyoutu.be%2Fabc123def45",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/chat")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Test Video"));
    assert!(body.contains("user_question"));
}

#[tokio::test]
async fn asking_questions_appends_alternating_turns() {
    let app = test_app_with_chain(Arc::new(StubChain));

    // Establish a session by submitting a URL
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(
                    "video_url=https%3A%2F%2Fyoutu.be%2Fabc123def45",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    // First question runs against an empty history
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .header(header::COOKIE, cookie)
                .body(Body::from("user_question=What+is+covered"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let body = body_text(response).await;
    assert!(body.contains("What is covered"));
    assert!(body.contains("Answer to What is covered with 0 prior turns"));

    // Second question sees both turns from the first exchange
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .header(header::COOKIE, cookie)
                .body(Body::from("user_question=Tell+me+more"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let body = body_text(response).await;

    // All four turns render in submission order
    let q1 = body.find("What is covered").unwrap();
    let a1 = body
        .find("Answer to What is covered with 0 prior turns")
        .unwrap();
    let q2 = body.find("Tell me more").unwrap();
    let a2 = body
        .find("Answer to Tell me more with 2 prior turns")
        .unwrap();
    assert!(q1 < a1 && a1 < q2 && q2 < a2);

    // The history survives in the cookie across a plain page load
    let response = app
        .oneshot(
            Request::builder()
                .uri("/chat")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Answer to What is covered with 0 prior turns"));
    assert!(body.contains("Answer to Tell me more with 2 prior turns"));
}

#[tokio::test]
async fn delete_history_redirects_to_chat() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/delete-chat-history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/chat");
}

#[tokio::test]
async fn submitting_empty_url_renders_error_page() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("video_url=%20"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("valid YouTube"));
}
