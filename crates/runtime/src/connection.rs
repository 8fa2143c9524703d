//! HTTP connection to a remote WebDriver endpoint.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;
use wd_protocol::{NewSessionRequest, SessionCreated, WireError};

use crate::command::{Command, Dialect, Route};
use crate::error::{Error, Result};

/// Client for one driver endpoint.
///
/// Holds no session state; callers pass the session id and dialect with
/// every command.
#[derive(Debug, Clone)]
pub struct Connection {
	client: reqwest::Client,
	base: Url,
}

impl Connection {
	/// Creates a connection to `endpoint` (e.g. `http://localhost:9515` or
	/// `http://grid:4444/wd/hub`).
	///
	/// `request_timeout` bounds each HTTP request; it should exceed the
	/// session's script timeout so async scripts are not cut off client-side.
	pub fn new(endpoint: &str, request_timeout: Option<Duration>) -> Result<Self> {
		let mut base = Url::parse(endpoint).map_err(|e| Error::InvalidArgument(format!("invalid driver endpoint '{endpoint}': {e}")))?;
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}

		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = request_timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder
			.build()
			.map_err(|e| Error::ConnectionFailed(format!("failed to create HTTP client: {e}")))?;

		Ok(Self { client, base })
	}

	/// Returns the normalised endpoint URL.
	pub fn endpoint(&self) -> &Url {
		&self.base
	}

	/// Creates a session and detects the dialect from the response shape.
	pub async fn new_session(&self, request: NewSessionRequest) -> Result<(SessionCreated, Dialect)> {
		let routes = Command::NewSession(request).routes(Dialect::W3c, None)?;
		let mut body = Value::Null;
		for route in &routes {
			body = self.send(route).await?;
		}

		let dialect = if body.get("value").and_then(|v| v.get("sessionId")).is_some() {
			Dialect::W3c
		} else {
			Dialect::Legacy
		};

		let created = SessionCreated::from_response(&body)
			.ok_or_else(|| Error::SessionNotCreated(format!("driver response carried no session id: {body}")))?;

		debug!(target: "wd", session = %created.session_id, ?dialect, "session created");
		Ok((created, dialect))
	}

	/// Executes a session-scoped command and returns its `value` payload.
	pub async fn execute(&self, dialect: Dialect, session_id: &str, command: &Command) -> Result<Value> {
		let routes = command.routes(dialect, Some(session_id))?;
		debug!(target: "wd", command = command.name(), session = session_id, "webdriver command");

		let mut value = Value::Null;
		for route in &routes {
			let mut body = self.send(route).await?;
			value = body.get_mut("value").map(Value::take).unwrap_or(Value::Null);
		}
		Ok(value)
	}

	async fn send(&self, route: &Route) -> Result<Value> {
		let url = self
			.base
			.join(&route.path)
			.map_err(|e| Error::InvalidArgument(format!("invalid command path '{}': {e}", route.path)))?;

		trace!(target: "wd", method = %route.method, url = %url, body = ?route.body, "request");

		let mut request = self.client.request(route.method.clone(), url);
		if let Some(body) = &route.body {
			request = request.json(body);
		}

		let response = request.send().await?;
		let status = response.status();
		let text = response.text().await?;

		trace!(target: "wd", status = %status, body = %text, "response");

		let body: Value = if text.trim().is_empty() {
			Value::Null
		} else {
			match serde_json::from_str(&text) {
				Ok(body) => body,
				Err(_) => return Err(Error::ProtocolError(format!("HTTP {status} with non-JSON body: {}", snippet(&text)))),
			}
		};

		if !status.is_success() {
			return Err(WireError::from_body(&body)
				.map(Error::from)
				.unwrap_or_else(|| Error::ProtocolError(format!("HTTP {status} without a WebDriver error payload"))));
		}

		if let Some(wire) = WireError::from_legacy_status(&body) {
			return Err(wire.into());
		}

		Ok(body)
	}
}

fn snippet(text: &str) -> &str {
	let end = text.char_indices().nth(120).map(|(i, _)| i).unwrap_or(text.len());
	&text[..end]
}
