//! Scenario model: steps, scenarios and suites.
//!
//! Suites are built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "name": "smoke",
//!   "scenarios": [
//!     { "name": "main window", "steps": [
//!       { "kind": "assert_session" },
//!       { "kind": "switch_to", "label": "Hello OpenFin" },
//!       { "kind": "find", "slot": "cpu", "locator": { "by": "id", "value": "cpu-info" } },
//!       { "kind": "click", "slot": "cpu" }
//!     ]}
//!   ]
//! }
//! ```

mod report;
mod runner;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wd_protocol::By;

pub use report::{Failure, ScenarioReport, ScenarioStatus, SuiteReport};
pub use runner::{RunOptions, Runner};

/// One unit of work inside a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
	/// The session exists and has not been quit.
	AssertSession,
	/// A previous lookup stored an element in `slot`.
	AssertPresent { slot: String },
	/// The value stored in `slot` equals `expected`.
	AssertEquals { slot: String, expected: Value },
	/// The value stored in `slot` equals the configured runtime version.
	AssertVersion { slot: String },
	/// Makes the first window titled `label` current.
	SwitchTo { label: String },
	/// Stores the first element matching `locator`, or nothing, in `slot`.
	Find { slot: String, locator: By },
	/// Clicks the element stored in `slot`.
	Click { slot: String },
	/// Runs a synchronous script.
	Execute {
		script: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		args: Vec<Value>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		store: Option<String>,
	},
	/// Runs a script that reports through its completion callback.
	ExecuteAsync {
		script: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		args: Vec<Value>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		store: Option<String>,
	},
	/// Pauses for `ms` milliseconds.
	Wait { ms: u64 },
}

impl Step {
	/// Short human-readable form used in logs and reports.
	pub fn describe(&self) -> String {
		match self {
			Step::AssertSession => "assert session".to_string(),
			Step::AssertPresent { slot } => format!("assert present {slot}"),
			Step::AssertEquals { slot, expected } => format!("assert {slot} == {expected}"),
			Step::AssertVersion { slot } => format!("assert version {slot}"),
			Step::SwitchTo { label } => format!("switch to '{label}'"),
			Step::Find { slot, locator } => format!("find {locator} -> {slot}"),
			Step::Click { slot } => format!("click {slot}"),
			Step::Execute { script, .. } => format!("execute {}", abbreviate(script)),
			Step::ExecuteAsync { script, .. } => format!("execute async {}", abbreviate(script)),
			Step::Wait { ms } => format!("wait {ms}ms"),
		}
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe())
	}
}

fn abbreviate(script: &str) -> String {
	const MAX: usize = 48;
	let script = script.trim();
	match script.char_indices().nth(MAX) {
		Some((end, _)) => format!("{}...", &script[..end]),
		None => script.to_string(),
	}
}

/// A named, ordered list of steps with its own slot store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
	pub name: String,
	pub steps: Vec<Step>,
}

impl Scenario {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			steps: Vec::new(),
		}
	}

	pub fn step(mut self, step: Step) -> Self {
		self.steps.push(step);
		self
	}

	pub fn assert_session(self) -> Self {
		self.step(Step::AssertSession)
	}

	pub fn assert_present(self, slot: &str) -> Self {
		self.step(Step::AssertPresent { slot: slot.to_string() })
	}

	pub fn assert_equals(self, slot: &str, expected: Value) -> Self {
		self.step(Step::AssertEquals {
			slot: slot.to_string(),
			expected,
		})
	}

	pub fn assert_version(self, slot: &str) -> Self {
		self.step(Step::AssertVersion { slot: slot.to_string() })
	}

	pub fn switch_to(self, label: &str) -> Self {
		self.step(Step::SwitchTo { label: label.to_string() })
	}

	pub fn find(self, slot: &str, locator: By) -> Self {
		self.step(Step::Find {
			slot: slot.to_string(),
			locator,
		})
	}

	pub fn click(self, slot: &str) -> Self {
		self.step(Step::Click { slot: slot.to_string() })
	}

	/// Runs `script` synchronously, keeping its value in `store` when given.
	pub fn execute(self, script: &str, store: Option<&str>) -> Self {
		self.step(Step::Execute {
			script: script.to_string(),
			args: Vec::new(),
			store: store.map(str::to_string),
		})
	}

	/// Runs `script` asynchronously, keeping its callback value in `store` when given.
	pub fn execute_async(self, script: &str, store: Option<&str>) -> Self {
		self.step(Step::ExecuteAsync {
			script: script.to_string(),
			args: Vec::new(),
			store: store.map(str::to_string),
		})
	}

	pub fn wait(self, ms: u64) -> Self {
		self.step(Step::Wait { ms })
	}
}

/// Ordered scenarios that share one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
	pub name: String,
	pub scenarios: Vec<Scenario>,
}

impl Suite {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			scenarios: Vec::new(),
		}
	}

	pub fn scenario(mut self, scenario: Scenario) -> Self {
		self.scenarios.push(scenario);
		self
	}

	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}

	pub fn step_count(&self) -> usize {
		self.scenarios.iter().map(|s| s.steps.len()).sum()
	}
}
