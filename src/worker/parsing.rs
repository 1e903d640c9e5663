//! Lenient parsing of the invocation request body.
//!
//! A malformed body never fails the invocation: unusable fields fall back to
//! their defaults with a warning.

use serde_json::Value;
use tracing::warn;

use crate::core::models::{DEFAULT_SINCE_HOURS, InvocationRequest};

/// Builds an [`InvocationRequest`] from a Lambda payload.
///
/// Accepts the request object itself, an HTTP-style envelope whose `body`
/// holds the JSON as a string, or `null`.
#[must_use]
pub fn parse_request(payload: &Value) -> InvocationRequest {
    match payload {
        Value::Null => InvocationRequest::default(),
        Value::String(raw) => parse_request_str(raw),
        Value::Object(map) => {
            if let Some(Value::String(body)) = map.get("body") {
                return parse_request_str(body);
            }
            InvocationRequest {
                test_mode: bool_field(payload, "test_mode"),
                since_hours: since_hours_field(payload),
                dry_run: bool_field(payload, "dry_run"),
            }
        }
        other => {
            warn!("Unexpected payload type, using defaults: {}", other);
            InvocationRequest::default()
        }
    }
}

/// Parses a raw request body string.
#[must_use]
pub fn parse_request_str(raw: &str) -> InvocationRequest {
    if raw.trim().is_empty() {
        return InvocationRequest::default();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(_)) | Err(_) => {
            warn!("Error parsing payload (using defaults): {}", raw);
            InvocationRequest::default()
        }
        Ok(value) => parse_request(&value),
    }
}

fn bool_field(payload: &Value, name: &str) -> bool {
    match payload.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!("Ignoring non-boolean {}: {}", name, other);
            false
        }
    }
}

fn since_hours_field(payload: &Value) -> u32 {
    match payload.get("since_hours") {
        None | Some(Value::Null) => DEFAULT_SINCE_HOURS,
        Some(value) => match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(hours) if hours > 0 => hours,
            _ => {
                warn!(
                    "Invalid since_hours {}, using default {}",
                    value, DEFAULT_SINCE_HOURS
                );
                DEFAULT_SINCE_HOURS
            }
        },
    }
}
