//! Alert payload and extracted signal

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw alert body, origin-agnostic. Lives for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAlert(Map<String, Value>);

impl RawAlert {
    /// Parse a request body. Anything that is not a JSON object is `{}`.
    pub fn from_body(body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<Value>(body).or_else(|_| {
            // Invalid UTF-8 inside an otherwise valid document
            serde_json::from_str::<Value>(&String::from_utf8_lossy(body))
        });

        match parsed {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                tracing::debug!("Request body is not JSON ({}), treating as empty payload", e);
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Utilization percentage extracted from an alert. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct CpuSignal(f64);

impl CpuSignal {
    pub const NONE: CpuSignal = CpuSignal(0.0);

    /// Clamp to `>= 0`; non-finite input yields `None`
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then(|| Self(value.max(0.0)))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_body_is_empty() {
        assert!(RawAlert::from_body(b"{not json").is_empty());
        assert!(RawAlert::from_body(b"").is_empty());
    }

    #[test]
    fn test_non_object_body_is_empty() {
        assert!(RawAlert::from_body(b"[1, 2, 3]").is_empty());
        assert!(RawAlert::from_body(b"\"cpu\"").is_empty());
    }

    #[test]
    fn test_object_body_kept() {
        let alert = RawAlert::from_body(br#"{"cpu": 42}"#);
        assert_eq!(alert.get("cpu"), Some(&json!(42)));
    }

    #[test]
    fn test_signal_clamps_negative() {
        assert_eq!(CpuSignal::new(-5.0).map(CpuSignal::value), Some(0.0));
        assert_eq!(CpuSignal::new(f64::NAN), None);
        assert_eq!(CpuSignal::new(f64::INFINITY), None);
    }
}
