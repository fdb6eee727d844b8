//! Total serialization for audit payloads
//!
//! Argument and result snapshots must never break an audited call. Both
//! functions here try JSON first and fall back to the value's `Debug` text.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Serialize a value to a JSON string, falling back to its `Debug` rendering
pub fn serialize<T>(value: &T) -> String
where
    T: Serialize + Debug + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::debug!(error = %e, "Audit payload is not JSON-serializable, using debug text");
            format!("{:?}", value)
        }
    }
}

/// Capture a value as a JSON tree, falling back to its `Debug` rendering as a string
pub fn snapshot<T>(value: &T) -> Value
where
    T: Serialize + Debug + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::debug!(error = %e, "Audit value is not JSON-serializable, using debug text");
            Value::String(format!("{:?}", value))
        }
    }
}
