//! POST /trivia/generate-sports-trivia

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id_of,
    routes::trivia::trivia_request::GenerateTriviaRequest,
};

pub const PROMPT_REQUIRED: &str = "Prompt is required and must be a non-empty string";

/// Handler: POST /trivia/generate-sports-trivia
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3001/trivia/generate-sports-trivia \
///   -H 'content-type: application/json' \
///   -d '{"prompt":"IPL finals"}'
/// ```
pub async fn generate_sports_trivia(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let request_id = request_id_of(&headers);
    let topic = GenerateTriviaRequest::new(&body)
        .topic()
        .ok_or_else(|| AppError::BadRequest(PROMPT_REQUIRED.into()))?;

    debug!(request_id = %request_id, topic = %topic, "generate_sports_trivia: start");

    match state.pipeline.run(topic).await {
        Ok(outcome) => {
            info!(
                request_id = %request_id,
                route = ?outcome.route,
                "generate_sports_trivia: success"
            );
            Ok(ApiResponse::success(outcome.response.data)
                .into_response_with_status(StatusCode::OK))
        }
        Err(err) => {
            error!(request_id = %request_id, error = %err, "generate_sports_trivia: failed");
            Err(err.into())
        }
    }
}
