//! Feature Vector Builder
//!
//! **The layout below is a contract with the classifier artifact.**
//! The model was trained on exactly this order; it is not self-describing.
//! Changing the order or length requires retraining the model.

use serde::Serialize;

use crate::models::{CpuSignal, RawAlert};
use super::normalizer::coerce_f64;

/// Feature names in the exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "cpu",        // 0: extracted CPU signal
    "memory",     // 1: raw payload field
    "disk_io",    // 2: raw payload field
    "network_io", // 3: raw payload field
];

pub const FEATURE_COUNT: usize = 4;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

/// Fixed-order model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build from the normalized signal plus auxiliary payload fields.
    /// Missing or non-numeric fields are 0.0.
    pub fn build(alert: &RawAlert, cpu: CpuSignal) -> Self {
        let mut values = [0.0f32; FEATURE_COUNT];
        values[0] = cpu.value() as f32;

        for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT).skip(1) {
            *slot = alert.get(name).and_then(coerce_f64).unwrap_or(0.0) as f32;
        }

        Self { values }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        FEATURE_LAYOUT
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }
}
