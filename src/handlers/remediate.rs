//! Ingestion endpoint

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::logic::{normalize, FeatureVector};
use crate::models::{RawAlert, RemediateResponse, RemediationResult};
use crate::AppState;

/// POST /remediate - accepts any body; malformed or unreadable input is an empty alert
pub async fn remediate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> RemediateResponse {
    let alert = match body {
        Ok(body) => RawAlert::from_body(&body),
        Err(e) => {
            tracing::warn!("Unreadable request body ({}), treating as empty payload", e);
            RawAlert::default()
        }
    };
    let span = tracing::info_span!("remediate", request_id = %Uuid::new_v4());

    run_pipeline(&state, &alert).instrument(span).await
}

/// Normalize, decide, dispatch, render
pub async fn run_pipeline(state: &AppState, alert: &RawAlert) -> RemediateResponse {
    tracing::info!("Received remediate payload: {}", serde_json::to_string(alert).unwrap_or_default());

    let cpu = normalize(alert);
    tracing::info!("Parsed CPU value: {}", cpu.value());

    let features = FeatureVector::build(alert, cpu);
    let decision = state.engine.decide(&features, cpu).await;
    tracing::info!(remediate = decision.remediate, reason = %decision.reason, "Decision made");

    if !decision.remediate {
        return RemediateResponse::Ok {
            reason: decision.reason.reported(),
            cpu: decision.cpu,
        };
    }

    let replicas = state.engine.policy().target_replicas;
    match state.dispatcher.dispatch(&state.target, replicas).await {
        Ok(action) => {
            tracing::info!("Scaled {} to {} replicas", action.target, action.replicas);
            RemediateResponse::Success { action, cpu: decision.cpu }
        }
        Err(e) => {
            let failed = RemediationResult::dispatch_failed(&state.target, replicas);
            tracing::error!(target_deployment = %failed.target, status = ?failed.status, "Scale failed: {}", e);
            RemediateResponse::Failed { error: e.to_string() }
        }
    }
}
