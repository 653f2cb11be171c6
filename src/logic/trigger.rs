//! Alternate dispatcher
//!
//! Invoked by an external event source, never by `/remediate`. It skips the
//! decision engine entirely and always sets the target's desired count to
//! [`TRIGGER_DESIRED_COUNT`].

use serde::Serialize;

use super::dispatch::Dispatcher;
use crate::constants::TRIGGER_DESIRED_COUNT;
use crate::error::DispatchError;
use crate::models::{RemediationResult, ScaleTarget};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RemediationResult>,
}

impl TriggerResponse {
    pub fn failed(target: &ScaleTarget, error: &DispatchError) -> Self {
        Self {
            message: format!("Failed to scale {}: {}", target, error),
            action: Some(RemediationResult::dispatch_failed(target, TRIGGER_DESIRED_COUNT)),
        }
    }
}

/// Handle one trigger event
pub async fn handle_event(
    dispatcher: &dyn Dispatcher,
    target: &ScaleTarget,
) -> Result<TriggerResponse, DispatchError> {
    tracing::info!("Scale trigger received for {}", target);

    dispatcher.dispatch(target, TRIGGER_DESIRED_COUNT).await?;

    Ok(TriggerResponse {
        message: "Frontend scaled from trigger".to_string(),
        action: None,
    })
}
