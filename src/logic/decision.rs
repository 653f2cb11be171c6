//! Decision Engine
//!
//! Combines the optional classifier with a static CPU threshold:
//!
//! | classifier            | remediate when                 |
//! |-----------------------|--------------------------------|
//! | present, label ok     | `label == 1` OR `cpu > threshold` |
//! | present, inference fails | `cpu > threshold`           |
//! | absent                | `cpu > threshold`              |
//!
//! The threshold is always an independent safety net; the two signals are
//! OR-ed. Remediation is binary: the target replica count never depends on
//! signal magnitude.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

use super::classifier::{ClassifierHandle, ANOMALY_LABEL};
use super::features::FeatureVector;
use crate::config::Config;
use crate::error::InferenceError;
use crate::models::{CpuSignal, Decision, DecisionReason};

/// Fixed remediation policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Policy {
    pub cpu_threshold: f64,
    pub target_replicas: u32,
}

impl Policy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cpu_threshold: config.cpu_threshold,
            target_replicas: config.target_replicas,
        }
    }

    pub fn exceeded(&self, cpu: CpuSignal) -> bool {
        cpu.value() > self.cpu_threshold
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Engine status for `/status`
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub classifier_loaded: bool,
    pub model_path: Option<String>,
    pub mode: &'static str,
    pub cpu_threshold: f64,
    pub target_replicas: u32,
    pub inference_count: u64,
    pub inference_failures: u64,
    pub avg_latency_ms: f32,
}

#[derive(Debug, Default)]
struct InferenceStats {
    count: AtomicU64,
    failures: AtomicU64,
    latency_sum_us: AtomicU64,
}

#[derive(Debug)]
pub struct DecisionEngine {
    classifier: ClassifierHandle,
    policy: Policy,
    stats: InferenceStats,
}

impl DecisionEngine {
    pub fn new(classifier: ClassifierHandle, policy: Policy) -> Self {
        Self {
            classifier,
            policy,
            stats: InferenceStats::default(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Consult the classifier (if any) and apply the threshold
    pub async fn decide(&self, features: &FeatureVector, cpu: CpuSignal) -> Decision {
        let start = Instant::now();
        let prediction = self.classifier.infer(*features).await;

        if let Some(result) = &prediction {
            self.stats.count.fetch_add(1, Ordering::Relaxed);
            self.stats
                .latency_sum_us
                .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);

            match result {
                Ok(label) => tracing::info!("Model prediction: {}", label),
                Err(e) => {
                    self.stats.failures.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Model predict failed, falling back to threshold: {}", e);
                }
            }
        }

        self.resolve(prediction, cpu)
    }

    /// Pure decision table over an already-computed prediction
    pub fn resolve(&self, prediction: Option<Result<i64, InferenceError>>, cpu: CpuSignal) -> Decision {
        let over = self.policy.exceeded(cpu);

        let (remediate, reason) = match prediction {
            Some(Ok(label)) if label == ANOMALY_LABEL => (true, DecisionReason::ModelAnomaly),
            Some(Ok(_)) if over => (true, DecisionReason::ThresholdExceeded),
            Some(Ok(_)) => (false, DecisionReason::ModelNormal),
            Some(Err(_)) if over => (true, DecisionReason::ClassifierErrorFallbackRemediate),
            Some(Err(_)) => (false, DecisionReason::ClassifierErrorFallbackOk),
            None if over => (true, DecisionReason::ThresholdExceeded),
            None => (false, DecisionReason::BelowThreshold),
        };

        Decision {
            remediate,
            reason,
            cpu: cpu.value(),
        }
    }

    pub fn status(&self) -> EngineStatus {
        let count = self.stats.count.load(Ordering::Relaxed);
        let sum = self.stats.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            classifier_loaded: self.classifier.is_present(),
            model_path: self.classifier.describe(),
            mode: if self.classifier.is_present() { "classifier" } else { "threshold" },
            cpu_threshold: self.policy.cpu_threshold,
            target_replicas: self.policy.target_replicas,
            inference_count: count,
            inference_failures: self.stats.failures.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::classifier::Classifier;

    struct Fixed(i64);

    impl Classifier for Fixed {
        fn predict(&self, _: &FeatureVector) -> Result<i64, InferenceError> {
            Ok(self.0)
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _: &FeatureVector) -> Result<i64, InferenceError> {
            Err(InferenceError("shape mismatch".to_string()))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn signal(v: f64) -> CpuSignal {
        CpuSignal::new(v).unwrap()
    }

    fn features(v: f64) -> FeatureVector {
        FeatureVector { values: [v as f32, 0.0, 0.0, 0.0] }
    }

    async fn decide(handle: ClassifierHandle, cpu: f64) -> Decision {
        DecisionEngine::new(handle, Policy::default())
            .decide(&features(cpu), signal(cpu))
            .await
    }

    #[tokio::test]
    async fn test_threshold_only() {
        let d = decide(ClassifierHandle::Absent, 85.5).await;
        assert!(d.remediate);
        assert_eq!(d.reason, DecisionReason::ThresholdExceeded);

        // strict greater-than
        let d = decide(ClassifierHandle::Absent, 85.0).await;
        assert!(!d.remediate);
        assert_eq!(d.reason, DecisionReason::BelowThreshold);
    }

    #[tokio::test]
    async fn test_model_anomaly_below_threshold() {
        let d = decide(ClassifierHandle::present(Fixed(1)), 20.0).await;
        assert!(d.remediate);
        assert_eq!(d.reason, DecisionReason::ModelAnomaly);
    }

    #[tokio::test]
    async fn test_threshold_overrides_normal_label() {
        let d = decide(ClassifierHandle::present(Fixed(0)), 95.0).await;
        assert!(d.remediate);
        assert_eq!(d.reason, DecisionReason::ThresholdExceeded);

        let d = decide(ClassifierHandle::present(Fixed(0)), 50.0).await;
        assert!(!d.remediate);
        assert_eq!(d.reason, DecisionReason::ModelNormal);
    }

    #[tokio::test]
    async fn test_inference_failure_matches_threshold_only() {
        for cpu in [0.0, 50.0, 85.0, 85.1, 90.0, 100.0] {
            let fallback = decide(ClassifierHandle::present(Broken), cpu).await;
            let plain = decide(ClassifierHandle::Absent, cpu).await;
            assert_eq!(fallback.remediate, plain.remediate, "cpu={}", cpu);
        }

        let d = decide(ClassifierHandle::present(Broken), 99.0).await;
        assert_eq!(d.reason, DecisionReason::ClassifierErrorFallbackRemediate);
        let d = decide(ClassifierHandle::present(Broken), 10.0).await;
        assert_eq!(d.reason, DecisionReason::ClassifierErrorFallbackOk);
    }

    #[tokio::test]
    async fn test_status_counts_inference() {
        let engine = DecisionEngine::new(ClassifierHandle::present(Broken), Policy::default());
        engine.decide(&features(10.0), signal(10.0)).await;
        engine.decide(&features(10.0), signal(10.0)).await;

        let status = engine.status();
        assert!(status.classifier_loaded);
        assert_eq!(status.mode, "classifier");
        assert_eq!(status.inference_count, 2);
        assert_eq!(status.inference_failures, 2);
    }

    #[test]
    fn test_threshold_status() {
        let engine = DecisionEngine::new(ClassifierHandle::Absent, Policy::default());
        let status = engine.status();
        assert_eq!(status.mode, "threshold");
        assert_eq!(status.inference_count, 0);
        assert_eq!(status.avg_latency_ms, 0.0);
    }
}
