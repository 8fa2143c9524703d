use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};
use wd::{Runner, Suite, SuiteReport};

use crate::cli::RunArgs;
use crate::config::HarnessConfig;
use crate::error::{Result, WdError};
use crate::output::{self, CommandInputs, CommandResult, ErrorCode, OutputFormat, ResultBuilder};
use crate::suites;

pub(super) async fn execute(config: &HarnessConfig, args: RunArgs, format: OutputFormat) -> Result<()> {
	let started = Instant::now();

	let suite = match args.suite {
		Some(ref path) => load_suite(path)?,
		None => suites::hello_openfin(config),
	};
	if suite.scenarios.is_empty() {
		return Err(WdError::InvalidInput(format!("suite '{}' has no scenarios", suite.name)));
	}
	info!(target: "wd", suite = %suite.name, endpoint = %config.remote_driver_url, "starting run");

	let mut session = super::start_session(config).await?;
	let report = Runner::new(config.run_options()).run_suite(&mut session, &suite).await;
	let effective = super::effective_config(config, &session);
	let quit_error = super::close_session(&mut session).await;

	let report_error = match args.report {
		Some(ref path) => write_report(path, &report).err(),
		None => None,
	};

	let builder = ResultBuilder::new("run").started_at(started).inputs(CommandInputs {
		suite: args.suite.clone(),
		..Default::default()
	});
	let result = envelope(builder.config(effective), report, quit_error, report_error);

	match (format, result.data.as_ref()) {
		(OutputFormat::Text, Some(report)) => {
			output::print_suite_text(report);
			if let Some(ref error) = result.error {
				output::print_error_stderr(error);
			}
		}
		_ => output::print_result(&result, format),
	}

	if result.ok { Ok(()) } else { Err(WdError::OutputAlreadyPrinted) }
}

/// Completes the `run` envelope. The suite report is always kept as data.
///
/// A report file that cannot be written fails an otherwise passing run with
/// `IO_ERROR`; after a failed suite it is only a warning.
fn envelope(
	mut builder: ResultBuilder<SuiteReport>,
	report: SuiteReport,
	quit_error: Option<String>,
	report_error: Option<WdError>,
) -> CommandResult<SuiteReport> {
	if let Some(message) = quit_error {
		builder = builder.warning("quit", message);
	}

	if !report.is_success() {
		let mut message = format!("{} of {} scenario(s) failed", report.failed(), report.scenarios.len());
		if report.aborted {
			message.push_str(&format!(", {} skipped after the session was lost", report.skipped()));
		}
		builder = builder.error(ErrorCode::SuiteFailed, message);
		if let Some(err) = report_error {
			builder = builder.warning("report", err.to_string());
		}
	} else if let Some(err) = report_error {
		builder = builder.command_error(err.to_command_error());
	}

	builder.data(report).build()
}

fn write_report(path: &Path, report: &SuiteReport) -> Result<()> {
	let json = serde_json::to_string_pretty(report)?;
	std::fs::write(path, json).map_err(|source| {
		warn!(target: "wd", path = %path.display(), error = %source, "could not write report");
		WdError::ReportWrite {
			path: path.to_path_buf(),
			source,
		}
	})
}

fn load_suite(path: &Path) -> Result<Suite> {
	let content = std::fs::read_to_string(path).map_err(|source| WdError::SuiteRead {
		path: path.to_path_buf(),
		source,
	})?;
	Suite::from_json(&content).map_err(|source| WdError::SuiteParse {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use wd::{ScenarioReport, ScenarioStatus};

	use super::*;

	fn report(statuses: &[ScenarioStatus]) -> SuiteReport {
		SuiteReport {
			name: "smoke".into(),
			scenarios: statuses
				.iter()
				.enumerate()
				.map(|(i, status)| ScenarioReport {
					name: format!("scenario {i}"),
					status: *status,
					steps_run: 1,
					duration_ms: 1,
					failure: None,
				})
				.collect(),
			aborted: false,
			duration_ms: 2,
		}
	}

	fn unwritable_report() -> WdError {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing").join("report.json");
		write_report(&path, &report(&[ScenarioStatus::Passed])).unwrap_err()
	}

	#[test]
	fn report_is_written_as_json() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("report.json");
		write_report(&path, &report(&[ScenarioStatus::Passed])).unwrap();

		let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
		assert_eq!(written["name"], "smoke");
		assert_eq!(written["scenarios"][0]["status"], "passed");
	}

	#[test]
	fn report_in_missing_directory_is_an_io_error() {
		let err = unwritable_report();
		assert!(matches!(err, WdError::ReportWrite { .. }));

		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::IoError);
		assert!(cmd.details.unwrap()["path"].as_str().unwrap().ends_with("report.json"));
	}

	#[test]
	fn unwritten_report_fails_a_passing_run_but_keeps_the_data() {
		let result = envelope(
			ResultBuilder::new("run"),
			report(&[ScenarioStatus::Passed, ScenarioStatus::Passed]),
			None,
			Some(unwritable_report()),
		);

		assert!(!result.ok);
		assert_eq!(result.error.as_ref().map(|e| e.code), Some(ErrorCode::IoError));
		assert_eq!(result.data.as_ref().map(|r| r.scenarios.len()), Some(2));
	}

	#[test]
	fn unwritten_report_after_a_failed_suite_is_a_warning() {
		let result = envelope(
			ResultBuilder::new("run"),
			report(&[ScenarioStatus::Passed, ScenarioStatus::Failed]),
			Some("Transport error: reset".into()),
			Some(unwritable_report()),
		);

		assert_eq!(result.error.as_ref().map(|e| e.code), Some(ErrorCode::SuiteFailed));
		let sources: Vec<_> = result.warnings.iter().map(|w| w.source.as_str()).collect();
		assert_eq!(sources, ["quit", "report"]);
		assert!(result.data.is_some());
	}

	#[test]
	fn passing_run_with_report_is_ok() {
		let result = envelope(ResultBuilder::new("run"), report(&[ScenarioStatus::Passed]), None, None);
		assert!(result.ok);
		assert!(result.warnings.is_empty());
	}

	#[test]
	fn suite_file_is_loaded() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"{{"name": "smoke", "scenarios": [{{"name": "main", "steps": [{{"kind": "switch_to", "label": "Main"}}]}}]}}"#
		)
		.unwrap();

		let suite = load_suite(file.path()).unwrap();
		assert_eq!(suite.name, "smoke");
		assert_eq!(suite.step_count(), 1);
	}

	#[test]
	fn broken_suite_file_is_invalid_input() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(br#"{"name": "smoke", "scenarios": [{"name": "x", "steps": [{"kind": "teleport"}]}]}"#)
			.unwrap();

		let err = load_suite(file.path()).unwrap_err();
		assert!(matches!(err, WdError::SuiteParse { .. }));
		assert_eq!(err.to_command_error().code, ErrorCode::InvalidInput);
	}
}
