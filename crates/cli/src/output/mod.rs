//! Result envelope printed by every command.
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": false,
//!   "command": "run",
//!   "data": { "name": "hello-openfin", "scenarios": [ ... ] },
//!   "error": { "code": "SUITE_FAILED", "message": "1 of 7 scenario(s) failed" },
//!   "timings": { "durationMs": 8120 }
//! }
//! ```
//!
//! A failed suite still carries its report in `data`. Setup failures carry
//! only `error`.


use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use wd::{ScenarioReport, ScenarioStatus, SuiteReport};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// TOON (default, compact)
	#[default]
	Toon,
	Json,
	/// One JSON document per line
	Ndjson,
	/// Coloured, for terminals
	Text,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub schema_version: u32,
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inputs: Option<CommandInputs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	pub timings: Timings,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub warnings: Vec<Warning>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub config: Option<EffectiveConfig>,
}

/// What the command was asked to do.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInputs {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suite: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub script: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub window: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Value>,
}

/// Stable failure categories consumers can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Config file unreadable or malformed
	ConfigError,
	/// Driver unreachable, session refused or lost
	SessionError,
	/// At least one scenario failed or was skipped
	SuiteFailed,
	WindowNotFound,
	Timeout,
	/// Suite file or command arguments rejected
	InvalidInput,
	IoError,
	InternalError,
}

impl ErrorCode {
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorCode::ConfigError => "CONFIG_ERROR",
			ErrorCode::SessionError => "SESSION_ERROR",
			ErrorCode::SuiteFailed => "SUITE_FAILED",
			ErrorCode::WindowNotFound => "WINDOW_NOT_FOUND",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		}
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

/// Non-fatal trouble, such as a session that would not quit.
#[derive(Debug, Serialize)]
pub struct Warning {
	pub source: String,
	pub message: String,
}

/// Settings the command actually ran with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
	pub endpoint: String,
	pub timeout_ms: u64,
	/// Wire dialect detected from the new-session response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dialect: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expected_version: Option<String>,
}

pub struct ResultBuilder<T: Serialize> {
	command: String,
	started: Instant,
	inputs: Option<CommandInputs>,
	data: Option<T>,
	error: Option<CommandError>,
	warnings: Vec<Warning>,
	config: Option<EffectiveConfig>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			started: Instant::now(),
			inputs: None,
			data: None,
			error: None,
			warnings: Vec::new(),
			config: None,
		}
	}

	/// Measures from `started` rather than from builder creation.
	pub fn started_at(mut self, started: Instant) -> Self {
		self.started = started;
		self
	}

	pub fn inputs(mut self, inputs: CommandInputs) -> Self {
		self.inputs = Some(inputs);
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.command_error(CommandError {
			code,
			message: message.into(),
			details: None,
		})
	}

	pub fn command_error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn warning(mut self, source: impl Into<String>, message: impl Into<String>) -> Self {
		self.warnings.push(Warning {
			source: source.into(),
			message: message.into(),
		});
		self
	}

	pub fn config(mut self, config: EffectiveConfig) -> Self {
		self.config = Some(config);
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			schema_version: SCHEMA_VERSION,
			ok: self.error.is_none(),
			command: self.command,
			inputs: self.inputs,
			data: self.data,
			error: self.error,
			timings: Timings {
				duration_ms: self.started.elapsed().as_millis() as u64,
			},
			warnings: self.warnings,
			config: self.config,
		}
	}
}

/// Prints `result` on stdout.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match render(result, format) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("failed to encode {} result: {err}", result.command),
	}
}

pub fn render<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) -> serde_json::Result<String> {
	match format {
		OutputFormat::Toon => Ok(toon::encode(&serde_json::to_value(result)?, None)),
		OutputFormat::Json => serde_json::to_string_pretty(result),
		OutputFormat::Ndjson => serde_json::to_string(result),
		OutputFormat::Text => render_text(result),
	}
}

fn render_text<T: Serialize>(result: &CommandResult<T>) -> serde_json::Result<String> {
	let mut lines = Vec::new();
	if let Some(ref data) = result.data {
		lines.push(serde_json::to_string_pretty(data)?);
	}
	if let Some(ref error) = result.error {
		lines.push(format!("{} [{}] {}", "error".red().bold(), error.code, error.message));
	}
	for warning in &result.warnings {
		lines.push(format!("{} ({}) {}", "warning".yellow(), warning.source, warning.message));
	}
	Ok(lines.join("\n"))
}

/// Prints a suite report as a checklist, one line per scenario.
pub fn print_suite_text(report: &SuiteReport) {
	println!("{}", report.name.cyan().bold());
	for scenario in &report.scenarios {
		println!("{}", scenario_line(scenario));
	}

	let summary = format!("{} passed, {} failed, {} skipped", report.passed(), report.failed(), report.skipped());
	let summary = if report.is_success() { summary.green().bold() } else { summary.red().bold() };
	println!("\n{summary}");
}

fn scenario_line(scenario: &ScenarioReport) -> String {
	match scenario.status {
		ScenarioStatus::Passed => format!("  {} {} {}", "✓".green(), scenario.name, format!("({}ms)", scenario.duration_ms).dimmed()),
		ScenarioStatus::Skipped => format!("  {} {} {}", "-".yellow(), scenario.name, "(skipped)".dimmed()),
		ScenarioStatus::Failed => {
			let mut line = format!("  {} {}", "✗".red(), scenario.name);
			if let Some(ref failure) = scenario.failure {
				let at = failure.step_name.as_deref().unwrap_or("-");
				line.push_str(&format!("\n      {} [{}] {}", at.dimmed(), failure.kind, failure.message));
			}
			line
		}
	}
}

pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "error".red().bold(), error.code, error.message);
}

/// One window as listed by `wd windows`.
#[derive(Debug, Clone, Serialize)]
pub struct WindowInfo {
	pub handle: String,
	pub title: String,
}

#[derive(Debug, Serialize)]
pub struct WindowsData {
	pub windows: Vec<WindowInfo>,
	pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct EvalData {
	pub result: Value,
	/// The script ran through the async callback path.
	pub asynchronous: bool,
	/// Handle of the window selected with `--window`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub window: Option<String>,
}
