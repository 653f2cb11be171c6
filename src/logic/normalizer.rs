//! Payload Normalizer
//!
//! Extracts a CPU utilization signal from whatever alert shape arrived.
//! Strategies run in a fixed order and the first one that yields a
//! finite number wins:
//!
//! 1. Cloud-monitor alarm forwarded through a notification topic
//!    (`Message` holds a JSON-encoded alarm).
//! 2. Alerting-rule-engine webhook (`alerts[].annotations`).
//! 3. Direct `cpu` field.
//!
//! Every strategy is total: a malformed shape makes it return `None` and
//! the next one is tried. Nothing here can fail a request.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::constants::ALARM_TRANSITION_CPU;
use crate::models::{CpuSignal, RawAlert};

type Strategy = fn(&RawAlert) -> Option<f64>;

/// Extraction order. First match wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("alarm_transition", from_alarm_transition),
    ("alert_annotations", from_alert_annotations),
    ("direct_field", from_direct_field),
];

/// `92%`, `92 %` or `CPU: 92` / `CPU 92`. The `CPU` token is case-sensitive.
static CPU_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,3})\s*%|\bCPU[:\s]+([0-9]{1,3})")
        .expect("CPU pattern is a valid regex")
});

/// Extract the CPU signal. Defaults to 0.0 when no strategy matches.
pub fn normalize(alert: &RawAlert) -> CpuSignal {
    for (name, strategy) in STRATEGIES {
        if let Some(signal) = strategy(alert).and_then(CpuSignal::new) {
            tracing::debug!(strategy = name, cpu = signal.value(), "CPU signal extracted");
            return signal;
        }
    }

    CpuSignal::NONE
}

/// Alarm state transitions carry no reliable CPU figure, so any transition
/// is reported as a high fixed value.
fn from_alarm_transition(alert: &RawAlert) -> Option<f64> {
    let encoded = alert.get("Message")?.as_str()?;
    let message: Value = serde_json::from_str(encoded).ok()?;
    let message = message.as_object()?;

    (message.contains_key("NewStateValue") && message.contains_key("Trigger"))
        .then_some(ALARM_TRANSITION_CPU)
}

fn from_alert_annotations(alert: &RawAlert) -> Option<f64> {
    let entries = alert
        .get("alerts")
        .filter(|v| is_truthy(v))
        .or_else(|| alert.get("Alerts"))?
        .as_array()?;

    for entry in entries {
        let annotations = match entry.as_object()?.get("annotations") {
            None => continue,
            Some(Value::Object(annotations)) => annotations,
            Some(_) => return None,
        };

        let text = annotations
            .get("description")
            .filter(|v| is_truthy(v))
            .or_else(|| annotations.get("summary"));

        let Some(text) = text.filter(|v| is_truthy(v)) else {
            continue;
        };

        if let Some(cpu) = match_cpu_text(text.as_str()?) {
            return Some(cpu);
        }
    }

    None
}

fn from_direct_field(alert: &RawAlert) -> Option<f64> {
    alert.get("cpu").and_then(coerce_f64)
}

/// First percentage or `CPU: N` token in free text
pub fn match_cpu_text(text: &str) -> Option<f64> {
    let caps = CPU_PATTERN.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Lenient numeric coercion: numbers, booleans and numeric strings.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Empty containers, empty strings, zero, false and null are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
