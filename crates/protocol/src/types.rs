//! Core value types used on the wire.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// JSON key identifying a web element reference in the W3C dialect.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4d3b0c5f8d83";

/// JSON key identifying a web element reference in the legacy JSON wire dialect.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Opaque identifier of one window (top-level browsing context).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(String);

impl WindowHandle {
	pub fn new(handle: impl Into<String>) -> Self {
		Self(handle.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for WindowHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for WindowHandle {
	fn from(handle: &str) -> Self {
		Self::new(handle)
	}
}

/// Reference to an element located within the current window.
///
/// Serializes under both the W3C and legacy keys so it can be passed back as a
/// script argument to either driver dialect. Deserializes from whichever key
/// is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawElementRef")]
pub struct ElementRef {
	id: String,
}

impl ElementRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}

	pub fn id(&self) -> &str {
		&self.id
	}
}

impl fmt::Display for ElementRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.id)
	}
}

impl Serialize for ElementRef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry(ELEMENT_KEY, &self.id)?;
		map.serialize_entry(LEGACY_ELEMENT_KEY, &self.id)?;
		map.end()
	}
}

#[derive(Deserialize)]
struct RawElementRef {
	#[serde(rename = "element-6066-11e4-a52f-4d3b0c5f8d83")]
	w3c: Option<String>,
	#[serde(rename = "ELEMENT")]
	legacy: Option<String>,
}

impl TryFrom<RawElementRef> for ElementRef {
	type Error = String;

	fn try_from(raw: RawElementRef) -> Result<Self, Self::Error> {
		raw.w3c
			.or(raw.legacy)
			.map(ElementRef::new)
			.ok_or_else(|| format!("element reference has neither '{ELEMENT_KEY}' nor '{LEGACY_ELEMENT_KEY}'"))
	}
}

/// Element location strategy understood by the W3C `elements` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
	#[serde(rename = "css selector")]
	Css,
	#[serde(rename = "link text")]
	LinkText,
	#[serde(rename = "tag name")]
	TagName,
	#[serde(rename = "xpath")]
	XPath,
}

/// Body of a find-elements request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
	pub using: Strategy,
	pub value: String,
}

/// User-facing element query.
///
/// `Id` has no W3C strategy of its own and is lowered to an attribute
/// selector, the same translation the official bindings perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum By {
	Id(String),
	Css(String),
	XPath(String),
	LinkText(String),
	TagName(String),
}

impl By {
	pub fn id(id: impl Into<String>) -> Self {
		Self::Id(id.into())
	}

	pub fn css(selector: impl Into<String>) -> Self {
		Self::Css(selector.into())
	}

	/// Lowers this query to a wire [`Locator`].
	pub fn to_locator(&self) -> Locator {
		match self {
			By::Id(id) => Locator {
				using: Strategy::Css,
				value: format!("[id=\"{}\"]", escape_css_string(id)),
			},
			By::Css(selector) => Locator {
				using: Strategy::Css,
				value: selector.clone(),
			},
			By::XPath(path) => Locator {
				using: Strategy::XPath,
				value: path.clone(),
			},
			By::LinkText(text) => Locator {
				using: Strategy::LinkText,
				value: text.clone(),
			},
			By::TagName(tag) => Locator {
				using: Strategy::TagName,
				value: tag.clone(),
			},
		}
	}
}

impl fmt::Display for By {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			By::Id(v) => write!(f, "id={v}"),
			By::Css(v) => write!(f, "css={v}"),
			By::XPath(v) => write!(f, "xpath={v}"),
			By::LinkText(v) => write!(f, "link={v}"),
			By::TagName(v) => write!(f, "tag={v}"),
		}
	}
}

fn escape_css_string(raw: &str) -> String {
	raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Session timeouts in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
	/// Implicit wait applied to element lookups.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub implicit: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_load: Option<u64>,
	/// Upper bound for injected scripts, including async completion.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub script: Option<u64>,
}

impl Timeouts {
	/// Sets every timeout to the same value.
	pub fn uniform(ms: u64) -> Self {
		Self {
			implicit: Some(ms),
			page_load: Some(ms),
			script: Some(ms),
		}
	}
}

/// Body of a synchronous or asynchronous execute request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRequest {
	pub script: String,
	#[serde(default)]
	pub args: Vec<Value>,
}

/// Body of a switch-to-window request.
///
/// `name` duplicates `handle` for legacy drivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchWindowRequest {
	pub handle: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

impl SwitchWindowRequest {
	pub fn new(handle: &WindowHandle) -> Self {
		Self {
			handle: handle.as_str().to_string(),
			name: Some(handle.as_str().to_string()),
		}
	}
}
