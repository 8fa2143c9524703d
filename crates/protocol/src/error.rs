//! Error payloads returned by remote drivers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INVALID_SESSION_ID: &str = "invalid session id";
pub const NO_SUCH_ELEMENT: &str = "no such element";
pub const NO_SUCH_WINDOW: &str = "no such window";
pub const SCRIPT_TIMEOUT: &str = "script timeout";
pub const SESSION_NOT_CREATED: &str = "session not created";
pub const STALE_ELEMENT_REFERENCE: &str = "stale element reference";
pub const TIMEOUT: &str = "timeout";
pub const UNKNOWN_ERROR: &str = "unknown error";

/// W3C error object (the `value` of a failed response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
	pub error: String,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

impl WireError {
	/// Reads an error from a failed response body, if it carries one.
	///
	/// Recognises the JSON wire shape first, then the W3C shape
	/// (`value.error`).
	pub fn from_body(body: &Value) -> Option<Self> {
		if body.get("status").and_then(Value::as_i64).is_some() {
			return Self::from_legacy_status(body);
		}

		let value = body.get("value")?;
		value.get("error")?.as_str()?;
		serde_json::from_value(value.clone()).ok()
	}

	/// Reads a JSON wire failure (non-zero top-level `status`).
	///
	/// Legacy drivers report failures with HTTP 200, so this is the only
	/// check applied to successful responses.
	pub fn from_legacy_status(body: &Value) -> Option<Self> {
		let status = body.get("status").and_then(Value::as_i64)?;
		if status == 0 {
			return None;
		}
		let message = body
			.get("value")
			.and_then(|v| v.get("message"))
			.and_then(Value::as_str)
			.unwrap_or_default()
			.to_string();
		Some(Self {
			error: legacy_error_name(status).to_string(),
			message,
			stacktrace: None,
		})
	}
}

/// Maps a JSON wire status code to its W3C error name.
pub fn legacy_error_name(status: i64) -> &'static str {
	match status {
		6 => INVALID_SESSION_ID,
		7 => NO_SUCH_ELEMENT,
		8 => "no such frame",
		9 => "unknown command",
		10 => STALE_ELEMENT_REFERENCE,
		11 => "element not interactable",
		12 => "invalid element state",
		15 => "element not selectable",
		17 => "javascript error",
		19 | 32 => "invalid selector",
		21 => TIMEOUT,
		23 => NO_SUCH_WINDOW,
		24 => "invalid cookie domain",
		25 => "unable to set cookie",
		26 => "unexpected alert open",
		27 => "no such alert",
		28 => SCRIPT_TIMEOUT,
		29 => "invalid element coordinates",
		33 => SESSION_NOT_CREATED,
		34 => "move target out of bounds",
		_ => UNKNOWN_ERROR,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn reads_w3c_error() {
		let body = json!({
			"value": { "error": "no such window", "message": "window was closed", "stacktrace": "#0 ..." }
		});
		let err = WireError::from_body(&body).unwrap();
		assert_eq!(err.error, NO_SUCH_WINDOW);
		assert_eq!(err.message, "window was closed");
		assert_eq!(err.stacktrace.as_deref(), Some("#0 ..."));
	}

	#[test]
	fn reads_legacy_status() {
		let body = json!({ "sessionId": "s", "status": 28, "value": { "message": "asynchronous script timeout" } });
		let err = WireError::from_body(&body).unwrap();
		assert_eq!(err.error, SCRIPT_TIMEOUT);
		assert_eq!(err.message, "asynchronous script timeout");
	}

	#[test]
	fn success_bodies_carry_no_error() {
		assert!(WireError::from_body(&json!({ "status": 0, "value": "Hello OpenFin" })).is_none());
		assert!(WireError::from_body(&json!({ "value": ["w1", "w2"] })).is_none());
		assert!(WireError::from_body(&json!({ "value": { "error": 3 } })).is_none());
	}

	#[test]
	fn legacy_check_ignores_w3c_shaped_script_values() {
		let body = json!({ "value": { "error": "not really", "message": "script result" } });
		assert!(WireError::from_legacy_status(&body).is_none());
	}

	#[test]
	fn unknown_legacy_codes_map_to_unknown_error() {
		assert_eq!(legacy_error_name(13), UNKNOWN_ERROR);
		assert_eq!(legacy_error_name(999), UNKNOWN_ERROR);
	}
}
