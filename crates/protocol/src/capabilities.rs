//! Session creation payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability keys that chromedriver only accepts vendor-prefixed in the
/// W3C dialect, paired with their prefixed spelling.
const VENDOR_KEYS: &[(&str, &str)] = &[("chromeOptions", "goog:chromeOptions")];

/// Body of a new-session request.
///
/// Carries the requested capabilities twice: as `capabilities.alwaysMatch`
/// for W3C drivers and as `desiredCapabilities` for legacy ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionRequest {
	pub capabilities: W3cCapabilities,
	pub desired_capabilities: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct W3cCapabilities {
	pub always_match: Map<String, Value>,
}

impl NewSessionRequest {
	/// Builds a request from user-supplied capabilities.
	///
	/// Defaults `browserName` to `chrome` and moves unprefixed vendor keys
	/// (e.g. `chromeOptions`) to their prefixed names for the W3C copy.
	pub fn new(desired: Map<String, Value>) -> Self {
		let mut desired = desired;
		desired
			.entry("browserName")
			.or_insert_with(|| Value::String("chrome".to_string()));

		let mut always_match = desired.clone();
		for (legacy, prefixed) in VENDOR_KEYS {
			if let Some(value) = always_match.remove(*legacy) {
				always_match.entry(*prefixed).or_insert(value);
			}
		}

		Self {
			capabilities: W3cCapabilities { always_match },
			desired_capabilities: desired,
		}
	}
}

/// Parsed new-session response.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCreated {
	pub session_id: String,
	pub capabilities: Value,
}

impl SessionCreated {
	/// Extracts the session id from either dialect.
	///
	/// W3C nests it as `value.sessionId`; the JSON wire dialect puts
	/// `sessionId` at the top level next to `value` holding the capabilities.
	pub fn from_response(body: &Value) -> Option<Self> {
		let value = body.get("value");
		if let Some(id) = value.and_then(|v| v.get("sessionId")).and_then(Value::as_str) {
			let capabilities = value
				.and_then(|v| v.get("capabilities"))
				.cloned()
				.unwrap_or(Value::Null);
			return Some(Self {
				session_id: id.to_string(),
				capabilities,
			});
		}

		let id = body.get("sessionId").and_then(Value::as_str)?;
		Some(Self {
			session_id: id.to_string(),
			capabilities: value.cloned().unwrap_or(Value::Null),
		})
	}
}
