use serde::{Deserialize, Serialize};

use crate::error::FailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
	Passed,
	Failed,
	/// Not run because an earlier scenario lost the session.
	Skipped,
}

/// Why a scenario failed and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
	pub kind: FailureKind,
	/// Index of the step that failed or was running when the timeout fired.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub step: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub step_name: Option<String>,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
	pub name: String,
	pub status: ScenarioStatus,
	/// Steps that completed successfully.
	pub steps_run: usize,
	pub duration_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub failure: Option<Failure>,
}

impl ScenarioReport {
	pub(crate) fn skipped(name: &str) -> Self {
		Self {
			name: name.to_string(),
			status: ScenarioStatus::Skipped,
			steps_run: 0,
			duration_ms: 0,
			failure: None,
		}
	}

	pub fn is_passed(&self) -> bool {
		self.status == ScenarioStatus::Passed
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
	pub name: String,
	pub scenarios: Vec<ScenarioReport>,
	/// True when a fatal session failure stopped the suite early.
	pub aborted: bool,
	pub duration_ms: u64,
}

impl SuiteReport {
	pub fn passed(&self) -> usize {
		self.count(ScenarioStatus::Passed)
	}

	pub fn failed(&self) -> usize {
		self.count(ScenarioStatus::Failed)
	}

	pub fn skipped(&self) -> usize {
		self.count(ScenarioStatus::Skipped)
	}

	/// Every scenario ran and passed.
	pub fn is_success(&self) -> bool {
		self.scenarios.iter().all(ScenarioReport::is_passed)
	}

	fn count(&self, status: ScenarioStatus) -> usize {
		self.scenarios.iter().filter(|s| s.status == status).count()
	}
}
