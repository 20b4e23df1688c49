mod chat;
mod documents;
mod error;
mod status;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(status::root))
        .route("/health", get(status::health))
        .route("/chat", post(chat::chat))
        .route("/documents", get(documents::list_documents))
        .route("/download/{*filename}", get(documents::download))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::assistant::{prompts, Assistant, ChatResponse};
    use crate::docs::{load_corpus, types::DocumentLink};
    use crate::llm::{InferenceBackend, InferenceError, FALLBACK_UPSTREAM};

    struct Offline;

    #[async_trait]
    impl InferenceBackend for Offline {
        async fn generate(&self, _prompt: &str) -> Result<String, InferenceError> {
            Err(InferenceError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }
        async fn is_available(&self) -> bool {
            false
        }
        fn model(&self) -> &str {
            "llama2:7b"
        }
    }

    fn app(dir: &Path) -> Router {
        let corpus = Arc::new(load_corpus(dir).unwrap());
        let backend: Arc<dyn InferenceBackend> = Arc::new(Offline);
        let assistant = Assistant::new(corpus, backend).with_rng(fastrand::Rng::with_seed(42));
        router(AppState::new(assistant, dir.to_path_buf()))
    }

    fn sop_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Safety_SOP.txt"), "Wear goggles at all times.").unwrap();
        dir
    }

    async fn post_chat(app: Router, message: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({ "message": message }).to_string();
        let resp = app
            .oneshot(
                Request::post("/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn send_get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_greeting() {
        let dir = sop_dir();
        let (status, body) = post_chat(app(dir.path()), "hi").await;
        assert_eq!(status, StatusCode::OK);
        let response = body["response"].as_str().unwrap();
        assert!(prompts::GREETINGS.contains(&response));
        assert!(body.get("files").is_none());
    }

    #[tokio::test]
    async fn test_chat_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut corpus = crate::docs::types::Corpus::default();
        corpus.push("Safety_SOP.docx", "Wear goggles.");
        let corpus = Arc::new(corpus);
        let backend: Arc<dyn InferenceBackend> = Arc::new(Offline);
        let app = router(AppState::new(
            Assistant::new(corpus, backend),
            dir.path().to_path_buf(),
        ));

        let (status, body) = post_chat(app, "send me the safety SOP").await;
        assert_eq!(status, StatusCode::OK);
        let reply: ChatResponse = serde_json::from_value(body).unwrap();
        assert!(reply.response.contains("Safety_SOP.docx"));
        assert_eq!(reply.files, Some(vec![DocumentLink::for_file("Safety_SOP.docx")]));
    }

    #[tokio::test]
    async fn test_chat_empty_message_is_400() {
        let dir = sop_dir();
        let (status, body) = post_chat(app(dir.path()), "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message cannot be empty");

        let (status, _) = post_chat(app(dir.path()), "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_model_down_still_200() {
        let dir = sop_dir();
        let (status, body) = post_chat(app(dir.path()), "Who is the CEO?").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], FALLBACK_UPSTREAM);
    }

    #[tokio::test]
    async fn test_download_traversal_rejected() {
        let dir = sop_dir();
        let resp = send_get(app(dir.path()), "/download/../../etc/passwd").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = send_get(app(dir.path()), "/download/..%2F..%2Fetc%2Fpasswd").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_file() {
        let dir = sop_dir();
        let resp = send_get(app(dir.path()), "/download/Safety_SOP.txt").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Safety_SOP.txt\""
        );
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "26");
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Wear goggles at all times.");
    }

    #[tokio::test]
    async fn test_download_missing_and_directory() {
        let dir = sop_dir();
        std::fs::create_dir(dir.path().join("archive")).unwrap();

        let resp = send_get(app(dir.path()), "/download/Missing.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = send_get(app(dir.path()), "/download/archive").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_documents_and_health() {
        let dir = sop_dir();

        let resp = send_get(app(dir.path()), "/documents").await;
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["documents"], serde_json::json!(["Safety_SOP.txt"]));
        assert_eq!(body["count"], 1);

        let resp = send_get(app(dir.path()), "/health").await;
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ollama"], "disconnected");
        assert_eq!(body["documents_loaded"], 1);
        assert_eq!(body["backend"], "running");

        let resp = send_get(app(dir.path()), "/").await;
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["model"], "llama2:7b");
        assert_eq!(body["documents"], 1);
    }
}
