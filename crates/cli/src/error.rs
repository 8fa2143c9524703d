use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, WdError>;

#[derive(Debug, Error)]
pub enum WdError {
	/// Command failed but output has already been printed.
	/// Used to signal exit code 1 without additional output.
	#[error("")]
	OutputAlreadyPrinted,

	#[error("failed to read config {}: {source}", path.display())]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config {}: {source}", path.display())]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to read suite {}: {source}", path.display())]
	SuiteRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid suite {}: {source}", path.display())]
	SuiteParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("could not start a session at {endpoint}: {source}")]
	SessionStart {
		endpoint: String,
		#[source]
		source: wd::wd_runtime::Error,
	},

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("failed to write report {}: {source}", path.display())]
	ReportWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Harness(#[from] wd::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl WdError {
	/// Check if this error indicates output has already been printed.
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, WdError::OutputAlreadyPrinted)
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			WdError::OutputAlreadyPrinted => (ErrorCode::InternalError, None),
			WdError::ConfigRead { path, .. } | WdError::ConfigParse { path, .. } => {
				(ErrorCode::ConfigError, Some(serde_json::json!({ "path": path })))
			}
			WdError::SuiteRead { path, .. } | WdError::SuiteParse { path, .. } => {
				(ErrorCode::InvalidInput, Some(serde_json::json!({ "path": path })))
			}
			WdError::SessionStart { endpoint, .. } => (ErrorCode::SessionError, Some(serde_json::json!({ "endpoint": endpoint }))),
			WdError::InvalidInput(_) => (ErrorCode::InvalidInput, None),
			WdError::Harness(err) => harness_error(err),
			WdError::ReportWrite { path, .. } => (ErrorCode::IoError, Some(serde_json::json!({ "path": path }))),
			WdError::Json(_) => (ErrorCode::InternalError, None),
		};

		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}
}

fn harness_error(err: &wd::Error) -> (ErrorCode, Option<serde_json::Value>) {
	match err {
		wd::Error::NotFound { label, rounds, last_seen } => (
			ErrorCode::WindowNotFound,
			Some(serde_json::json!({ "label": label, "rounds": rounds, "lastSeen": last_seen })),
		),
		wd::Error::Timeout { .. } => (ErrorCode::Timeout, None),
		wd::Error::Session(remote) if remote.is_timeout() => (ErrorCode::Timeout, None),
		wd::Error::Session(remote) => {
			let details = remote.error_name().map(|name| serde_json::json!({ "error": name }));
			(ErrorCode::SessionError, details)
		}
		wd::Error::SessionClosed => (ErrorCode::SessionError, None),
		wd::Error::Assertion(_) => (ErrorCode::InternalError, None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn config_errors_carry_the_path() {
		let err = WdError::ConfigRead {
			path: PathBuf::from("/nope/wd.json"),
			source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
		};
		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::ConfigError);
		assert!(cmd.message.contains("/nope/wd.json"));
		assert_eq!(cmd.details.unwrap()["path"], "/nope/wd.json");
	}

	#[test]
	fn unreachable_driver_is_a_session_error() {
		let err = WdError::SessionStart {
			endpoint: "http://127.0.0.1:1".into(),
			source: wd::wd_runtime::Error::ConnectionFailed("refused".into()),
		};
		assert_eq!(err.to_command_error().code, ErrorCode::SessionError);
	}

	#[test]
	fn switcher_exhaustion_reports_last_seen_titles() {
		let err = WdError::from(wd::Error::NotFound {
			label: "Target".into(),
			rounds: 50,
			last_seen: vec!["Loading".into()],
		});
		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::WindowNotFound);
		let details = cmd.details.unwrap();
		assert_eq!(details["rounds"], 50);
		assert_eq!(details["lastSeen"][0], "Loading");
	}

	#[test]
	fn remote_failures_expose_the_w3c_name() {
		let err = WdError::from(wd::Error::from(wd::wd_runtime::Error::Remote {
			error: "javascript error".into(),
			message: "fin is not defined".into(),
			stacktrace: None,
		}));
		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::SessionError);
		assert_eq!(cmd.details.unwrap()["error"], "javascript error");
	}
}
