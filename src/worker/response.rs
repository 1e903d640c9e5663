//! Response bodies returned to the invoker.

use serde_json::{Value, json};
use tracing::error;

use crate::core::models::InvocationReport;
use crate::errors::NotifierError;

/// Success-shaped body, returned even when some releases failed.
#[must_use]
pub fn ok_report(report: &InvocationReport) -> Value {
    serde_json::to_value(report).unwrap_or_else(|e| {
        error!("Failed to serialize report: {}", e);
        err_response(&format!("Failed to serialize report: {e}"))
    })
}

/// Error-shaped body for configuration and fetch failures.
#[must_use]
pub fn err_response(message: &str) -> Value {
    json!({ "error": message })
}

#[must_use]
pub fn fatal_response(error: &NotifierError) -> Value {
    err_response(&error.to_string())
}

/// Whether `body` is the error-shaped response.
#[must_use]
pub fn is_error_response(body: &Value) -> bool {
    body.get("error").is_some()
}
