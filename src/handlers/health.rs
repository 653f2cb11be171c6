//! Liveness, health and engine status handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::EngineStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    environment: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    engine: EngineStatus,
    target: String,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": format!("{} v{} running!", APP_NAME, APP_VERSION) }))
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: APP_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
        environment: state.config.environment.clone(),
    })
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        engine: state.engine.status(),
        target: state.target.to_string(),
    })
}
