//! [`Automation`] over a remote WebDriver endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use wd_protocol::{By, ElementRef, NewSessionRequest, ScriptRequest, Timeouts, WindowHandle};
use wd_runtime::{Command, Connection, Dialect, Error, Result};

use crate::automation::Automation;

/// How to reach the driver and what to ask it for.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
	/// Driver base URL, e.g. `http://localhost:9515`.
	pub endpoint: String,
	/// Requested capabilities, sent in both dialects.
	pub capabilities: Map<String, Value>,
	/// Session timeouts applied right after creation.
	pub timeouts: Option<Timeouts>,
	/// Client-side bound for each HTTP request.
	pub request_timeout: Option<Duration>,
}

impl RemoteOptions {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			capabilities: Map::new(),
			timeouts: None,
			request_timeout: None,
		}
	}

	pub fn capabilities(mut self, capabilities: Map<String, Value>) -> Self {
		self.capabilities = capabilities;
		self
	}

	pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
		self.timeouts = Some(timeouts);
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);
		self
	}
}

/// A live session on a remote driver.
#[derive(Debug)]
pub struct RemoteSession {
	connection: Connection,
	session_id: String,
	dialect: Dialect,
}

impl RemoteSession {
	/// Creates a session and applies the configured timeouts.
	///
	/// If the timeouts are rejected the new session is deleted before the
	/// error is returned.
	pub async fn start(options: RemoteOptions) -> Result<Self> {
		let connection = Connection::new(&options.endpoint, options.request_timeout)?;
		let (created, dialect) = connection.new_session(NewSessionRequest::new(options.capabilities)).await?;

		debug!(target: "wd", capabilities = %created.capabilities, "driver capabilities");
		let session = Self {
			connection,
			session_id: created.session_id,
			dialect,
		};
		info!(target: "wd", session = %session.session_id, endpoint = %session.connection.endpoint(), ?dialect, "remote session started");

		if let Some(timeouts) = options.timeouts {
			if let Err(err) = session.run(Command::SetTimeouts(timeouts)).await {
				warn!(target: "wd", error = %err, "setting timeouts failed, deleting session");
				if let Err(cleanup) = session.run(Command::DeleteSession).await {
					debug!(target: "wd", error = %cleanup, "session cleanup failed");
				}
				return Err(err);
			}
		}

		Ok(session)
	}

	pub fn id(&self) -> &str {
		&self.session_id
	}

	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	async fn run(&self, command: Command) -> Result<Value> {
		self.connection.execute(self.dialect, &self.session_id, &command).await
	}
}

#[async_trait]
impl Automation for RemoteSession {
	async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
		let value = self.run(Command::GetWindowHandles).await?;
		Ok(serde_json::from_value(value)?)
	}

	async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()> {
		self.run(Command::SwitchToWindow(handle.clone())).await?;
		Ok(())
	}

	async fn title(&self) -> Result<String> {
		match self.run(Command::GetTitle).await? {
			Value::String(title) => Ok(title),
			other => Err(Error::ProtocolError(format!("expected a title string, got {other}"))),
		}
	}

	async fn find_elements(&self, by: &By) -> Result<Vec<ElementRef>> {
		let value = self.run(Command::FindElements(by.to_locator())).await?;
		Ok(serde_json::from_value(value)?)
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		self.run(Command::ElementClick(element.clone())).await?;
		Ok(())
	}

	async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
		self.run(Command::ExecuteScript(ScriptRequest {
			script: script.to_string(),
			args,
		}))
		.await
	}

	async fn execute_async(&self, script: &str, args: Vec<Value>) -> Result<Value> {
		self.run(Command::ExecuteAsyncScript(ScriptRequest {
			script: script.to_string(),
			args,
		}))
		.await
	}

	async fn quit(&self) -> Result<()> {
		self.run(Command::DeleteSession).await?;
		info!(target: "wd", session = %self.session_id, "remote session ended");
		Ok(())
	}
}
