use axum::{Json, http::StatusCode, response::Response};
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::http::response_envelope::ApiResponse;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub hello: &'static str,
    pub message: &'static str,
    pub endpoints: Value,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        hello: "world",
        message: "Sports trivia backend",
        endpoints: json!({
            "health": "GET /health",
            "readiness": "GET /readiness",
            "generateTrivia": "POST /trivia/generate-sports-trivia",
            "fetchTrivia": "POST /fetch-sports-trivia",
            "users": "GET|POST /users, GET|PUT|DELETE /users/{id}",
        }),
    })
}

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    ApiResponse::<()>::error("NOT_FOUND", "Route not found", Vec::new())
        .into_response_with_status(StatusCode::NOT_FOUND)
}
