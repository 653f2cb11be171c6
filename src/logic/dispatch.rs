//! Remediation Dispatcher
//!
//! Scaling goes through the narrow [`Dispatcher`] seam so the mechanism
//! (CLI subprocess today) can change without touching the decision logic.
//!
//! One call is one attempt: no retry, no backoff, and no deduplication of
//! concurrent identical alerts. Two alerts arriving together both dispatch.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::Config;
use crate::error::DispatchError;
use crate::models::{RemediationResult, ScaleTarget};

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(
        &self,
        target: &ScaleTarget,
        replicas: u32,
    ) -> Result<RemediationResult, DispatchError>;
}

/// Subcommand shape understood by the orchestrator CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleCommand {
    /// `scale deploy <name> -n <namespace> --replicas=<n>`
    KubectlScale,
    /// `ecs update-service --cluster <namespace> --service <name> --desired-count <n>`
    EcsUpdateService,
}

impl ScaleCommand {
    pub fn args(&self, target: &ScaleTarget, replicas: u32) -> Vec<String> {
        match self {
            ScaleCommand::KubectlScale => vec![
                "scale".to_string(),
                "deploy".to_string(),
                target.name.clone(),
                "-n".to_string(),
                target.namespace.clone(),
                format!("--replicas={}", replicas),
            ],
            ScaleCommand::EcsUpdateService => vec![
                "ecs".to_string(),
                "update-service".to_string(),
                "--cluster".to_string(),
                target.namespace.clone(),
                "--service".to_string(),
                target.name.clone(),
                "--desired-count".to_string(),
                replicas.to_string(),
            ],
        }
    }
}

/// Runs the scaling CLI as a subprocess with a bounded timeout
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    program: String,
    flags: Vec<String>,
    command: ScaleCommand,
    timeout: Duration,
}

impl CommandDispatcher {
    pub fn new(program: impl Into<String>, command: ScaleCommand, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            flags: Vec::new(),
            command,
            timeout,
        }
    }

    /// Global flags placed before the subcommand
    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }

    pub fn kubectl(config: &Config) -> Self {
        Self::new(&config.kubectl_bin, ScaleCommand::KubectlScale, config.dispatch_timeout)
            .with_flags(config.kubectl_flags.clone())
    }

    pub fn ecs(config: &Config) -> Self {
        Self::new(&config.aws_cli_bin, ScaleCommand::EcsUpdateService, config.dispatch_timeout)
    }

    fn command_line(&self, target: &ScaleTarget, replicas: u32) -> Vec<String> {
        let mut args = self.flags.clone();
        args.extend(self.command.args(target, replicas));
        args
    }
}

#[async_trait]
impl Dispatcher for CommandDispatcher {
    async fn dispatch(
        &self,
        target: &ScaleTarget,
        replicas: u32,
    ) -> Result<RemediationResult, DispatchError> {
        if replicas == 0 {
            return Err(DispatchError::InvalidReplicas(replicas));
        }

        let args = self.command_line(target, replicas);
        tracing::info!("Dispatching: {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program);
        child
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = timeout(self.timeout, child.output())
            .await
            .map_err(|_| DispatchError::Timeout {
                program: self.program.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| DispatchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // stderr folded into the diagnostic text
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        if !output.status.success() {
            return Err(DispatchError::CommandFailed {
                program: self.program.clone(),
                code: output.status.code().unwrap_or(-1),
                output: combined,
            });
        }

        tracing::debug!("{} output: {}", self.program, combined);
        Ok(RemediationResult::scaled(target, replicas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemediationStatus;

    fn target() -> ScaleTarget {
        ScaleTarget::new("front-end", "sock-shop")
    }

    /// `sh -c <script> sh <scale args...>`
    fn shell(script: &str, timeout: Duration) -> CommandDispatcher {
        CommandDispatcher::new("sh", ScaleCommand::KubectlScale, timeout).with_flags(vec![
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ])
    }

    #[test]
    fn test_kubectl_args() {
        let args = ScaleCommand::KubectlScale.args(&target(), 3);
        assert_eq!(
            args,
            ["scale", "deploy", "front-end", "-n", "sock-shop", "--replicas=3"]
        );
    }

    #[test]
    fn test_ecs_args() {
        let args = ScaleCommand::EcsUpdateService.args(&ScaleTarget::new("frontend", "myCluster"), 3);
        assert_eq!(
            args,
            ["ecs", "update-service", "--cluster", "myCluster", "--service", "frontend", "--desired-count", "3"]
        );
    }

    #[test]
    fn test_flags_precede_subcommand() {
        let dispatcher = CommandDispatcher::new("kubectl", ScaleCommand::KubectlScale, Duration::from_secs(1))
            .with_flags(vec!["--context=prod".to_string()]);
        let line = dispatcher.command_line(&target(), 3);
        assert_eq!(line[0], "--context=prod");
        assert_eq!(line[1], "scale");
    }

    #[tokio::test]
    async fn test_zero_replicas_rejected() {
        let dispatcher = shell("exit 0", Duration::from_secs(5));
        let err = dispatcher.dispatch(&target(), 0).await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidReplicas(0)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_dispatch() {
        // $6 is the --replicas flag
        let dispatcher = shell(r#"test "$6" = "--replicas=3""#, Duration::from_secs(5));
        let result = dispatcher.dispatch(&target(), 3).await.unwrap();
        assert_eq!(result.status, RemediationStatus::Scaled);
        assert_eq!(result.target, "sock-shop/front-end");
        assert_eq!(result.replicas, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_dispatch_captures_output() {
        let dispatcher = shell("echo 'deployments.apps \"front-end\" not found' >&2; exit 1", Duration::from_secs(5));
        let err = dispatcher.dispatch(&target(), 3).await.unwrap_err();
        match err {
            DispatchError::CommandFailed { code, output, .. } => {
                assert_eq!(code, 1);
                assert!(output.contains("not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_failure() {
        let dispatcher = shell("sleep 5", Duration::from_millis(100));
        let err = dispatcher.dispatch(&target(), 3).await.unwrap_err();
        assert!(matches!(err, DispatchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dispatcher = CommandDispatcher::new(
            "/nonexistent/kubectl",
            ScaleCommand::KubectlScale,
            Duration::from_secs(5),
        );
        let err = dispatcher.dispatch(&target(), 3).await.unwrap_err();
        assert!(matches!(err, DispatchError::Spawn { .. }));
    }
}
