//! Error handling
//!
//! Payload parse failures and per-strategy extraction failures never leave
//! the normalizer, so they have no type here.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Startup configuration rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid policy: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("cpu threshold must be a finite number")]
    NonFiniteThreshold,
}

/// Classifier artifact could not be loaded at startup
#[derive(Debug, Error)]
pub enum ClassifierLoadError {
    #[error("model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load model {}: {message}", .path.display())]
    Session { path: PathBuf, message: String },

    #[error("model {} declares no outputs", .0.display())]
    NoOutput(PathBuf),
}

/// Per-request classifier failure
#[derive(Debug, Error)]
#[error("inference failed: {0}")]
pub struct InferenceError(pub String);

/// External scaling command failure
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("replica count must be positive, got {0}")]
    InvalidReplicas(u32),

    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("{program} exited with status {code}: {output}")]
    CommandFailed {
        program: String,
        code: i32,
        output: String,
    },
}
