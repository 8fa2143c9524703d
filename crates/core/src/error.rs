use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// A pre- or postcondition of a step did not hold.
	#[error("assertion failed: {0}")]
	Assertion(String),

	/// A session operation failed.
	#[error(transparent)]
	Session(#[from] wd_runtime::Error),

	/// The session was used after it was quit.
	#[error("session is closed")]
	SessionClosed,

	/// The context switcher exhausted its budget.
	#[error("no window titled '{label}' after {rounds} round(s); last seen: {}", format_seen(.last_seen))]
	NotFound {
		label: String,
		rounds: u32,
		last_seen: Vec<String>,
	},

	/// A scenario did not finish within the overall timeout.
	#[error("timeout after {ms}ms: {what}")]
	Timeout { ms: u64, what: String },
}

fn format_seen(seen: &[String]) -> String {
	if seen.is_empty() {
		return "<no windows>".to_string();
	}
	seen.iter().map(|t| format!("'{t}'")).collect::<Vec<_>>().join(", ")
}

/// Report category of a scenario failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
	Assertion,
	Session,
	NotFound,
	Timeout,
}

impl std::fmt::Display for FailureKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FailureKind::Assertion => write!(f, "assertion"),
			FailureKind::Session => write!(f, "session"),
			FailureKind::NotFound => write!(f, "not_found"),
			FailureKind::Timeout => write!(f, "timeout"),
		}
	}
}

impl Error {
	pub(crate) fn assertion(message: impl Into<String>) -> Self {
		Error::Assertion(message.into())
	}

	pub fn kind(&self) -> FailureKind {
		match self {
			Error::Assertion(_) => FailureKind::Assertion,
			Error::Session(_) | Error::SessionClosed => FailureKind::Session,
			Error::NotFound { .. } => FailureKind::NotFound,
			Error::Timeout { .. } => FailureKind::Timeout,
		}
	}

	/// Returns true when no further scenario can use the session.
	pub fn is_fatal(&self) -> bool {
		match self {
			Error::Session(err) => err.is_fatal(),
			Error::SessionClosed => true,
			_ => false,
		}
	}

	pub(crate) fn is_no_such_window(&self) -> bool {
		matches!(self, Error::Session(err) if err.is_no_such_window())
	}
}
