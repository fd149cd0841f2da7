//! Liveness and readiness probes. Both answer from local state only.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since the state was composed.
    pub uptime: f64,
    pub environment: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub generation: &'static str,
    pub retrieval: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub checks: ReadinessChecks,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn readiness(State(state): State<Arc<AppState>>) -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        status: "ready",
        timestamp: Utc::now().to_rfc3339(),
        checks: ReadinessChecks {
            generation: configured(state.generation_configured),
            retrieval: configured(state.pipeline.retrieval_active()),
        },
    })
}

fn configured(on: bool) -> &'static str {
    if on { "configured" } else { "disabled" }
}
