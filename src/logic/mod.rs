//! Remediation pipeline
//!
//! normalizer -> features -> decision (classifier) -> dispatch

pub mod normalizer;
pub mod features;
pub mod classifier;
pub mod decision;
pub mod dispatch;
pub mod trigger;

pub use classifier::{Classifier, ClassifierHandle, OnnxClassifier};
pub use decision::{DecisionEngine, EngineStatus, Policy};
pub use dispatch::{CommandDispatcher, Dispatcher, ScaleCommand};
pub use features::FeatureVector;
pub use normalizer::normalize;
