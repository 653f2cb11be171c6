//! Classifier Adapter - ONNX Runtime Integration
//!
//! The model is loaded once at startup. A missing or broken artifact is a
//! normal operating mode (threshold-only), never a startup failure.
//! The handle is never swapped after startup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;

use super::features::{FeatureVector, FEATURE_COUNT};
use crate::error::{ClassifierLoadError, InferenceError};

/// Label meaning "anomalous, remediate"
pub const ANOMALY_LABEL: i64 = 1;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Maps a feature vector to an integer label
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError>;

    /// Human-readable origin, e.g. the artifact path
    fn describe(&self) -> String;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxClassifier {
    // `Session::run` needs `&mut`
    session: Mutex<Session>,
    output_name: String,
    path: PathBuf,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierLoadError> {
        if !path.exists() {
            return Err(ClassifierLoadError::NotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| session_error(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| session_error(path, e))?
            .commit_from_file(path)
            .map_err(|e| session_error(path, e))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ClassifierLoadError::NoOutput(path.to_path_buf()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            path: path.to_path_buf(),
        })
    }
}

fn session_error(path: &Path, e: impl fmt::Display) -> ClassifierLoadError {
    ClassifierLoadError::Session {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        let input = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features.as_slice().to_vec())
            .map_err(|e| InferenceError(format!("array error: {}", e)))?;

        let tensor = Tensor::from_array(input)
            .map_err(|e| InferenceError(format!("tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| InferenceError(format!("run failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError(format!("missing output '{}'", self.output_name)))?;

        // Classifier exports emit int64 labels; regressors emit float scores
        if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
            return labels
                .first()
                .copied()
                .ok_or_else(|| InferenceError("empty label tensor".to_string()));
        }

        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("extract error: {}", e)))?;

        scores
            .first()
            .map(|s| s.round() as i64)
            .ok_or_else(|| InferenceError("empty output tensor".to_string()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// Process-lifetime, read-only classifier capability
#[derive(Clone, Default)]
pub enum ClassifierHandle {
    Present(Arc<dyn Classifier>),
    #[default]
    Absent,
}

impl ClassifierHandle {
    /// Load from the configured path; any failure yields `Absent`
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::warn!("No model configured - using threshold fallback");
            return Self::Absent;
        };

        match OnnxClassifier::load(path) {
            Ok(classifier) => {
                tracing::info!("Loaded model from {}", path.display());
                Self::Present(Arc::new(classifier))
            }
            Err(ClassifierLoadError::NotFound(_)) => {
                tracing::warn!("No model found at {} - using threshold fallback", path.display());
                Self::Absent
            }
            Err(e) => {
                tracing::error!("Failed to load model: {} - using threshold fallback", e);
                Self::Absent
            }
        }
    }

    pub fn present(classifier: impl Classifier + 'static) -> Self {
        Self::Present(Arc::new(classifier))
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Present(c) => Some(c.describe()),
            Self::Absent => None,
        }
    }

    /// Run inference off the async workers. `None` when no classifier is loaded.
    pub async fn infer(&self, features: FeatureVector) -> Option<Result<i64, InferenceError>> {
        let Self::Present(classifier) = self else {
            return None;
        };

        let classifier = Arc::clone(classifier);
        let result = tokio::task::spawn_blocking(move || classifier.predict(&features))
            .await
            .unwrap_or_else(|e| Err(InferenceError(format!("inference task failed: {}", e))));

        Some(result)
    }
}

impl fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(c) => f.debug_tuple("Present").field(&c.describe()).finish(),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(i64);

    impl Classifier for Fixed {
        fn predict(&self, _: &FeatureVector) -> Result<i64, InferenceError> {
            Ok(self.0)
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[test]
    fn test_no_path_is_absent() {
        assert!(!ClassifierHandle::load(None).is_present());
    }

    #[test]
    fn test_missing_file_is_absent() {
        let handle = ClassifierHandle::load(Some(Path::new("/nonexistent/model.onnx")));
        assert!(!handle.is_present());
        assert!(handle.describe().is_none());
    }

    #[test]
    fn test_missing_file_load_error() {
        let err = OnnxClassifier::load(Path::new("/nonexistent/model.onnx")).err();
        assert!(matches!(err, Some(ClassifierLoadError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_absent_handle_skips_inference() {
        let features = FeatureVector { values: [95.0, 0.0, 0.0, 0.0] };
        assert!(ClassifierHandle::Absent.infer(features).await.is_none());
    }

    #[tokio::test]
    async fn test_present_handle_runs_inference() {
        let handle = ClassifierHandle::present(Fixed(ANOMALY_LABEL));
        let features = FeatureVector { values: [10.0, 0.0, 0.0, 0.0] };
        let label = handle.infer(features).await.unwrap().unwrap();
        assert_eq!(label, ANOMALY_LABEL);
    }
}
