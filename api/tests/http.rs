use std::sync::Arc;

use ai_llm_service::{AiLlmError, TextGenerator};
use api::{AppState, build_router};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use trivia_engine::{PipelineConfig, TriviaPipeline, fallback_trivia, sample_trivia};
use user_store::{InMemoryUserRepository, UserService};

struct FixedReply(Option<String>);

#[async_trait]
impl TextGenerator for FixedReply {
    async fn generate(&self, _prompt: &str, _system: Option<&str>) -> ai_llm_service::Result<String> {
        match &self.0 {
            Some(text) => Ok(text.clone()),
            None => Err(AiLlmError::Timeout(std::time::Duration::from_secs(1))),
        }
    }
}

/// Serves the router on an ephemeral port and returns its base URL.
async fn spawn_app(generation_reply: Option<String>) -> String {
    let pipeline = TriviaPipeline::new(
        Arc::new(FixedReply(Some("IPL".into()))),
        Arc::new(FixedReply(generation_reply)),
        None,
        PipelineConfig {
            retrieval_enabled: false,
            top_k: 5,
        },
    );
    let users = UserService::new(Arc::new(InMemoryUserRepository::seeded()));
    let state = Arc::new(AppState::new(pipeline, users, "test", true));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, build_router(state)).await;
    });
    format!("http://{addr}")
}

fn questions_json(v: &Value) -> Value {
    v["data"].clone()
}

#[tokio::test]
async fn generate_returns_model_questions() {
    let reply = serde_json::to_string(&sample_trivia()).unwrap();
    let base = spawn_app(Some(reply)).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/trivia/generate-sports-trivia"))
        .json(&json!({ "prompt": "IPL finals" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        questions_json(&body),
        serde_json::to_value(&sample_trivia().data).unwrap()
    );
}

#[tokio::test]
async fn generate_falls_back_when_backend_fails() {
    let base = spawn_app(None).await;
    let body: Value = reqwest::Client::new()
        .post(format!("{base}/trivia/generate-sports-trivia"))
        .json(&json!({ "prompt": "cricket" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        questions_json(&body),
        serde_json::to_value(&fallback_trivia().data).unwrap()
    );
}

#[tokio::test]
async fn blank_prompt_is_bad_request() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();
    let bodies = [
        json!({ "prompt": "" }),
        json!({ "prompt": "   " }),
        json!({ "prompt": 42 }),
        json!({}),
        json!(null),
        json!("IPL finals"),
        json!(42),
        json!([]),
    ];
    for body in bodies {
        let res = client
            .post(format!("{base}/trivia/generate-sports-trivia"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Prompt is required and must be a non-empty string");
    }
}

#[tokio::test]
async fn malformed_json_uses_envelope() {
    let base = spawn_app(None).await;
    let res = reqwest::Client::new()
        .post(format!("{base}/trivia/generate-sports-trivia"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn fetch_returns_sample_set() {
    let base = spawn_app(None).await;
    let body: Value = reqwest::Client::new()
        .post(format!("{base}/fetch-sports-trivia"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));
    assert_eq!(
        questions_json(&body),
        serde_json::to_value(&sample_trivia().data).unwrap()
    );
}

#[tokio::test]
async fn health_and_readiness_report_state() {
    let base = spawn_app(None).await;
    let health: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["environment"], "test");

    let ready: Value = reqwest::get(format!("{base}/readiness"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["checks"]["generation"], "configured");
    assert_eq!(ready["checks"]["retrieval"], "disabled");

    let root: Value = reqwest::get(format!("{base}/")).await.unwrap().json().await.unwrap();
    assert_eq!(root["hello"], "world");
}

#[tokio::test]
async fn user_crud_statuses() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();

    let list: Value = client
        .get(format!("{base}/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"].as_array().map(Vec::len), Some(2));

    let created = client
        .post(format!("{base}/users"))
        .json(&json!({ "email": "sam@example.com", "name": "Sam" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = created.json().await.unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert!(created["data"]["createdAt"].is_string());

    let missing = client
        .post(format!("{base}/users"))
        .json(&json!({ "email": "x@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let dup = client
        .post(format!("{base}/users"))
        .json(&json!({ "email": "john@example.com", "name": "J" }))
        .send()
        .await
        .unwrap();
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    let conflict = client
        .put(format!("{base}/users/{id}"))
        .json(&json!({ "email": "jane@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(conflict.status(), StatusCode::CONFLICT);

    let deleted = client
        .delete(format!("{base}/users/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    let deleted: Value = deleted.json().await.unwrap();
    assert_eq!(deleted["message"], "User deleted successfully");

    let gone = client
        .get(format!("{base}/users/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
