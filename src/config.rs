//! Configuration module

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use validator::Validate;

use crate::constants::*;
use crate::error::ConfigError;
use crate::models::ScaleTarget;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Validate)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Optional classifier artifact (ONNX). `None` means threshold-only mode.
    pub model_path: Option<PathBuf>,

    /// CPU percentage that triggers remediation (strict `>`)
    #[validate(range(min = 0.0, max = 100.0))]
    pub cpu_threshold: f64,

    /// Replica count the target is scaled to
    #[validate(range(min = 1))]
    pub target_replicas: u32,

    /// Deployment name acted upon by the scaling command
    #[validate(length(min = 1))]
    pub target_deployment: String,

    /// Namespace of the target deployment
    #[validate(length(min = 1))]
    pub target_namespace: String,

    /// Orchestrator CLI program
    pub kubectl_bin: String,

    /// Global flags placed before the scale subcommand
    pub kubectl_flags: Vec<String>,

    /// Timeout for one dispatch command
    pub dispatch_timeout: Duration,

    /// Alternate dispatcher cluster
    pub trigger_cluster: String,

    /// Alternate dispatcher service
    pub trigger_service: String,

    /// Alternate dispatcher CLI program
    pub aws_cli_bin: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_path: None,
            cpu_threshold: DEFAULT_CPU_THRESHOLD,
            target_replicas: DEFAULT_TARGET_REPLICAS,
            target_deployment: DEFAULT_TARGET_DEPLOYMENT.to_string(),
            target_namespace: DEFAULT_TARGET_NAMESPACE.to_string(),
            kubectl_bin: DEFAULT_KUBECTL_BIN.to_string(),
            kubectl_flags: Vec::new(),
            dispatch_timeout: Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECS),
            trigger_cluster: DEFAULT_TRIGGER_CLUSTER.to_string(),
            trigger_service: DEFAULT_TRIGGER_SERVICE.to_string(),
            aws_cli_bin: DEFAULT_AWS_CLI_BIN.to_string(),
            log_format: LogFormat::Text,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: parse_var("PORT", defaults.port),

            model_path: env::var("MODEL_PATH")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),

            cpu_threshold: parse_var("CPU_THRESHOLD", defaults.cpu_threshold),

            target_replicas: parse_var("TARGET_REPLICAS", defaults.target_replicas),

            target_deployment: env::var("TARGET_DEPLOYMENT")
                .unwrap_or(defaults.target_deployment),

            target_namespace: env::var("TARGET_NAMESPACE")
                .unwrap_or(defaults.target_namespace),

            kubectl_bin: env::var("KUBECTL_BIN").unwrap_or(defaults.kubectl_bin),

            kubectl_flags: env::var("KUBECTL_FLAGS")
                .map(|f| f.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),

            dispatch_timeout: Duration::from_secs(
                parse_var("DISPATCH_TIMEOUT_SECS", DEFAULT_DISPATCH_TIMEOUT_SECS),
            ),

            trigger_cluster: env::var("TRIGGER_CLUSTER").unwrap_or(defaults.trigger_cluster),

            trigger_service: env::var("TRIGGER_SERVICE").unwrap_or(defaults.trigger_service),

            aws_cli_bin: env::var("AWS_CLI_BIN").unwrap_or(defaults.aws_cli_bin),

            log_format: parse_var("LOG_FORMAT", defaults.log_format),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Reject policies that would make remediation meaningless
    pub fn validate_policy(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if !self.cpu_threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold);
        }
        Ok(())
    }

    /// Deployment the main pipeline scales
    pub fn scale_target(&self) -> ScaleTarget {
        ScaleTarget::new(&self.target_deployment, &self.target_namespace)
    }

    /// Service the alternate dispatcher scales
    pub fn trigger_target(&self) -> ScaleTarget {
        ScaleTarget::new(&self.trigger_service, &self.trigger_cluster)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
