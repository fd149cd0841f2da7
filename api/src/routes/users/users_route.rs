//! REST handlers over the in-memory user store.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use user_store::{CreateUser, UpdateUser};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

pub async fn list_users(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::success(state.users.list().await).into_response_with_status(StatusCode::OK)
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let user = state.users.get(&id).await?;
    Ok(ApiResponse::success(user).into_response_with_status(StatusCode::OK))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUser>,
) -> AppResult<Response> {
    let user = state.users.create(body).await?;
    Ok(ApiResponse::success(user).into_response_with_status(StatusCode::CREATED))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUser>,
) -> AppResult<Response> {
    let user = state.users.update(&id, body).await?;
    Ok(ApiResponse::success(user).into_response_with_status(StatusCode::OK))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.users.delete(&id).await?;
    Ok(ApiResponse::message("User deleted successfully").into_response_with_status(StatusCode::OK))
}
