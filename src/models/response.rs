//! `/remediate` response body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::{DecisionReason, RemediationResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemediateResponse {
    /// Remediation dispatched
    Success { action: RemediationResult, cpu: f64 },

    /// No action needed
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<DecisionReason>,
        cpu: f64,
    },

    /// Remediation was warranted but the dispatch failed
    Failed { error: String },
}

impl IntoResponse for RemediateResponse {
    fn into_response(self) -> Response {
        let status = match &self {
            RemediateResponse::Failed { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::OK,
        };

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScaleTarget;
    use serde_json::json;

    #[test]
    fn test_ok_without_reason_omits_field() {
        let body = serde_json::to_value(RemediateResponse::Ok { reason: None, cpu: 0.0 }).unwrap();
        assert_eq!(body, json!({"status": "ok", "cpu": 0.0}));
    }

    #[test]
    fn test_ok_with_reason() {
        let body = serde_json::to_value(RemediateResponse::Ok {
            reason: Some(DecisionReason::ModelNormal),
            cpu: 40.0,
        })
        .unwrap();
        assert_eq!(body, json!({"status": "ok", "reason": "model_normal", "cpu": 40.0}));
    }

    #[test]
    fn test_success_shape() {
        let target = ScaleTarget::new("front-end", "sock-shop");
        let body = serde_json::to_value(RemediateResponse::Success {
            action: RemediationResult::scaled(&target, 3),
            cpu: 92.0,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "status": "success",
                "action": {"status": "scaled", "target": "sock-shop/front-end", "replicas": 3},
                "cpu": 92.0
            })
        );
    }

    #[test]
    fn test_failed_is_bad_gateway() {
        let resp = RemediateResponse::Failed { error: "boom".into() }.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
