//! WebDriver commands and their HTTP routes.
//!
//! A [`Command`] is lowered to one or more [`Route`]s for a given
//! [`Dialect`]. Only legacy timeouts need more than one request.

use reqwest::Method;
use serde_json::{Value, json};
use wd_protocol::{ElementRef, Locator, NewSessionRequest, ScriptRequest, SwitchWindowRequest, Timeouts, WindowHandle};

use crate::error::{Error, Result};

/// Wire dialect spoken by the remote driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
	/// W3C WebDriver.
	#[default]
	W3c,
	/// Selenium JSON wire protocol (chromedriver 2.x and embedded runtimes built on it).
	Legacy,
}

/// One HTTP request against the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
	pub method: Method,
	/// Path relative to the driver base URL, without a leading slash.
	pub path: String,
	pub body: Option<Value>,
}

impl Route {
	fn get(path: String) -> Self {
		Self {
			method: Method::GET,
			path,
			body: None,
		}
	}

	fn post(path: String, body: Value) -> Self {
		Self {
			method: Method::POST,
			path,
			body: Some(body),
		}
	}
}

/// Commands used by the harness.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	NewSession(NewSessionRequest),
	DeleteSession,
	SetTimeouts(Timeouts),
	GetWindowHandles,
	SwitchToWindow(WindowHandle),
	GetTitle,
	FindElements(Locator),
	ElementClick(ElementRef),
	ExecuteScript(ScriptRequest),
	ExecuteAsyncScript(ScriptRequest),
}

impl Command {
	/// Stable name used in logs.
	pub fn name(&self) -> &'static str {
		match self {
			Command::NewSession(_) => "newSession",
			Command::DeleteSession => "deleteSession",
			Command::SetTimeouts(_) => "setTimeouts",
			Command::GetWindowHandles => "getWindowHandles",
			Command::SwitchToWindow(_) => "switchToWindow",
			Command::GetTitle => "getTitle",
			Command::FindElements(_) => "findElements",
			Command::ElementClick(_) => "elementClick",
			Command::ExecuteScript(_) => "executeScript",
			Command::ExecuteAsyncScript(_) => "executeAsyncScript",
		}
	}

	/// Lowers the command to HTTP requests.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] when a session-scoped command is
	/// routed without a session id.
	pub fn routes(&self, dialect: Dialect, session_id: Option<&str>) -> Result<Vec<Route>> {
		let base = match (self, session_id) {
			(Command::NewSession(_), _) => String::new(),
			(_, Some(session)) => format!("session/{session}"),
			(_, None) => return Err(Error::InvalidArgument(format!("{} requires an active session", self.name()))),
		};

		let routes = match self {
			Command::NewSession(request) => vec![Route::post("session".to_string(), serde_json::to_value(request)?)],
			Command::DeleteSession => vec![Route {
				method: Method::DELETE,
				path: base,
				body: None,
			}],
			Command::SetTimeouts(timeouts) => match dialect {
				Dialect::W3c => vec![Route::post(format!("{base}/timeouts"), serde_json::to_value(timeouts)?)],
				Dialect::Legacy => legacy_timeouts(&base, timeouts),
			},
			Command::GetWindowHandles => match dialect {
				Dialect::W3c => vec![Route::get(format!("{base}/window/handles"))],
				Dialect::Legacy => vec![Route::get(format!("{base}/window_handles"))],
			},
			Command::SwitchToWindow(handle) => vec![Route::post(
				format!("{base}/window"),
				serde_json::to_value(SwitchWindowRequest::new(handle))?,
			)],
			Command::GetTitle => vec![Route::get(format!("{base}/title"))],
			Command::FindElements(locator) => vec![Route::post(format!("{base}/elements"), serde_json::to_value(locator)?)],
			Command::ElementClick(element) => vec![Route::post(format!("{base}/element/{}/click", element.id()), json!({}))],
			Command::ExecuteScript(request) => {
				let path = match dialect {
					Dialect::W3c => format!("{base}/execute/sync"),
					Dialect::Legacy => format!("{base}/execute"),
				};
				vec![Route::post(path, serde_json::to_value(request)?)]
			}
			Command::ExecuteAsyncScript(request) => {
				let path = match dialect {
					Dialect::W3c => format!("{base}/execute/async"),
					Dialect::Legacy => format!("{base}/execute_async"),
				};
				vec![Route::post(path, serde_json::to_value(request)?)]
			}
		};

		Ok(routes)
	}
}

/// JSON wire drivers set each timeout through its own request.
fn legacy_timeouts(base: &str, timeouts: &Timeouts) -> Vec<Route> {
	let mut routes = Vec::new();
	if let Some(ms) = timeouts.implicit {
		routes.push(Route::post(format!("{base}/timeouts/implicit_wait"), json!({ "ms": ms })));
	}
	if let Some(ms) = timeouts.page_load {
		routes.push(Route::post(format!("{base}/timeouts"), json!({ "type": "page load", "ms": ms })));
	}
	if let Some(ms) = timeouts.script {
		routes.push(Route::post(format!("{base}/timeouts/async_script"), json!({ "ms": ms })));
	}
	routes
}
