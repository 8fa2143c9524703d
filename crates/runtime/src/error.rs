//! Error types for the WebDriver runtime.

use thiserror::Error;
use wd_protocol::{self as protocol, WireError};

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to a remote driver.
#[derive(Debug, Error)]
pub enum Error {
	/// The driver endpoint could not be reached.
	#[error("Failed to connect to WebDriver endpoint: {0}")]
	ConnectionFailed(String),

	/// The HTTP exchange failed after the connection was made.
	#[error("Transport error: {0}")]
	TransportError(String),

	/// The driver answered with something that is not a WebDriver response.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// The driver reported a command failure.
	#[error("{error}: {message}")]
	Remote {
		/// W3C error name (e.g., "no such window", "script timeout")
		error: String,
		/// Human-readable error message
		message: String,
		/// Driver-side stack trace (if available)
		stacktrace: Option<String>,
	},

	/// The driver refused to create a session.
	#[error("Session not created: {0}")]
	SessionNotCreated(String),

	/// The HTTP request timed out on the client side.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// Invalid argument provided to a command.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl From<WireError> for Error {
	fn from(wire: WireError) -> Self {
		if wire.error == protocol::SESSION_NOT_CREATED {
			return Error::SessionNotCreated(wire.message);
		}
		Error::Remote {
			error: wire.error,
			message: wire.message,
			stacktrace: wire.stacktrace,
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		if err.is_connect() {
			Error::ConnectionFailed(err.to_string())
		} else if err.is_timeout() {
			Error::Timeout(err.to_string())
		} else if err.is_decode() {
			Error::ProtocolError(err.to_string())
		} else {
			Error::TransportError(err.to_string())
		}
	}
}

impl Error {
	/// Returns the W3C error name if this is a Remote error.
	pub fn error_name(&self) -> Option<&str> {
		match self {
			Error::Remote { error, .. } => Some(error),
			_ => None,
		}
	}

	/// Returns the stack trace if this is a Remote error with a stack.
	pub fn stack_trace(&self) -> Option<&str> {
		match self {
			Error::Remote { stacktrace, .. } => stacktrace.as_deref(),
			_ => None,
		}
	}

	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Timeout(_) => true,
			Error::Remote { error, .. } => error == protocol::TIMEOUT || error == protocol::SCRIPT_TIMEOUT,
			_ => false,
		}
	}

	/// Returns true if the addressed window no longer exists.
	pub fn is_no_such_window(&self) -> bool {
		self.error_name() == Some(protocol::NO_SUCH_WINDOW)
	}

	/// Returns true when the session can no longer be used.
	///
	/// Covers lost transports and sessions the driver no longer knows about.
	pub fn is_fatal(&self) -> bool {
		match self {
			Error::ConnectionFailed(_) | Error::TransportError(_) | Error::SessionNotCreated(_) => true,
			Error::Remote { error, .. } => error == protocol::INVALID_SESSION_ID,
			_ => false,
		}
	}
}
