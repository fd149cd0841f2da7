//! POST /fetch-sports-trivia: canned sample, no generation.

use axum::{http::StatusCode, response::Response};
use trivia_engine::sample_trivia;

use crate::core::http::response_envelope::ApiResponse;

pub async fn fetch_sports_trivia() -> Response {
    ApiResponse::success(sample_trivia().data).into_response_with_status(StatusCode::OK)
}
