//! Remediation decision

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the decision engine chose its verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Classifier labelled the features anomalous
    ModelAnomaly,
    /// CPU above threshold (with or without a classifier)
    ThresholdExceeded,
    /// Classifier said normal and CPU within threshold
    ModelNormal,
    /// Classifier failed, CPU within threshold
    ClassifierErrorFallbackOk,
    /// Classifier failed, CPU above threshold
    ClassifierErrorFallbackRemediate,
    /// No classifier, CPU within threshold
    BelowThreshold,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::ModelAnomaly => "model_anomaly",
            DecisionReason::ThresholdExceeded => "threshold_exceeded",
            DecisionReason::ModelNormal => "model_normal",
            DecisionReason::ClassifierErrorFallbackOk => "classifier_error_fallback_ok",
            DecisionReason::ClassifierErrorFallbackRemediate => "classifier_error_fallback_remediate",
            DecisionReason::BelowThreshold => "below_threshold",
        }
    }

    /// Reason shown on a no-action response. Plain threshold passes say nothing.
    pub fn reported(self) -> Option<Self> {
        match self {
            DecisionReason::BelowThreshold => None,
            other => Some(other),
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for a single request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub remediate: bool,
    pub reason: DecisionReason,
    pub cpu: f64,
}
