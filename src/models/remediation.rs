//! Scaling target and dispatch outcome

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment identity a scaling command acts upon.
///
/// For the alternate dispatcher `namespace` holds the cluster and
/// `name` the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTarget {
    pub name: String,
    pub namespace: String,
}

impl ScaleTarget {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ScaleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationStatus {
    Scaled,
    DispatchFailed,
}

/// Outcome of one dispatch, rendered into the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationResult {
    pub status: RemediationStatus,
    pub target: String,
    pub replicas: u32,
}

impl RemediationResult {
    pub fn scaled(target: &ScaleTarget, replicas: u32) -> Self {
        Self {
            status: RemediationStatus::Scaled,
            target: target.to_string(),
            replicas,
        }
    }

    pub fn dispatch_failed(target: &ScaleTarget, replicas: u32) -> Self {
        Self {
            status: RemediationStatus::DispatchFailed,
            target: target.to_string(),
            replicas,
        }
    }
}
