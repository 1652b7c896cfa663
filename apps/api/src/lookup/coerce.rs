//! Null-coalescing of model output.
//!
//! One policy for every field: a value survives only when it has the
//! expected JSON type and carries information. Everything else becomes null.

use serde_json::{Map, Value};

use crate::models::phone::InferredFields;

/// Trimmed non-empty strings only.
pub fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// JSON booleans only. `"true"`, `1` and friends are not booleans.
pub fn coerce_bool(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Finite JSON numbers within `[-limit, limit]`. Zero is a value.
pub fn coerce_degrees(value: Option<&Value>, limit: f64) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && v.abs() <= limit)
}

/// Builds the model-only fields from a structured model output object.
/// Coordinates are kept only as a complete pair.
pub fn inferred_fields(output: &Map<String, Value>) -> InferredFields {
    let latitude = coerce_degrees(output.get("regionLatitude"), 90.0);
    let longitude = coerce_degrees(output.get("regionLongitude"), 180.0);

    let (region_latitude, region_longitude) = match (latitude, longitude) {
        (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
        _ => (None, None),
    };

    InferredFields {
        region_description: coerce_string(output.get("regionDescription")),
        carrier: coerce_string(output.get("carrier")),
        region_latitude,
        region_longitude,
    }
}
