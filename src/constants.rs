//! Central Policy Constants
//!
//! Single source of truth for remediation defaults.
//! Every value here can be overridden through `Config::from_env`
//! except the ones marked as fixed.

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// CPU percentage above which remediation is triggered (strict `>`)
pub const DEFAULT_CPU_THRESHOLD: f64 = 85.0;

/// Replica count the target is scaled to on remediation
pub const DEFAULT_TARGET_REPLICAS: u32 = 3;

/// Default deployment acted upon by the scaling command
pub const DEFAULT_TARGET_DEPLOYMENT: &str = "front-end";

/// Default namespace of the target deployment
pub const DEFAULT_TARGET_NAMESPACE: &str = "sock-shop";

/// Orchestrator CLI used for dispatch
pub const DEFAULT_KUBECTL_BIN: &str = "kubectl";

/// Upper bound for a single dispatch command (seconds)
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 30;

/// Cluster used by the alternate (event-triggered) dispatcher
pub const DEFAULT_TRIGGER_CLUSTER: &str = "myCluster";

/// Service used by the alternate (event-triggered) dispatcher
pub const DEFAULT_TRIGGER_SERVICE: &str = "frontend";

/// CLI used by the alternate dispatcher
pub const DEFAULT_AWS_CLI_BIN: &str = "aws";

/// Desired count set by the alternate dispatcher. Fixed.
pub const TRIGGER_DESIRED_COUNT: u32 = 3;

/// Signal reported for a cloud-monitor alarm state transition. Fixed.
///
/// The forwarded alarm message carries no usable CPU figure, so a
/// transition is reported as a value above the default threshold.
pub const ALARM_TRANSITION_CPU: f64 = 90.0;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "CloudIQ Remediator";
