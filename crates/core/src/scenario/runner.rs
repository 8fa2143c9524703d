use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use wd_protocol::ElementRef;

use super::report::{Failure, ScenarioReport, ScenarioStatus, SuiteReport};
use super::{Scenario, Step, Suite};
use crate::automation::Automation;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::switcher::SwitchPolicy;

/// Settings shared by every scenario of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
	/// Upper bound for one scenario, switcher polling included.
	pub scenario_timeout: Duration,
	pub switch: SwitchPolicy,
	/// Value `assert_version` steps compare against.
	pub expected_version: Option<String>,
}

impl Default for RunOptions {
	fn default() -> Self {
		Self {
			scenario_timeout: Duration::from_secs(60),
			switch: SwitchPolicy::default(),
			expected_version: None,
		}
	}
}

enum Slot {
	Element(Option<ElementRef>),
	Value(Value),
}

/// Scenario-scoped named results.
#[derive(Default)]
struct Slots(HashMap<String, Slot>);

impl Slots {
	fn element(&self, name: &str) -> Result<&ElementRef> {
		match self.0.get(name) {
			Some(Slot::Element(Some(element))) => Ok(element),
			Some(Slot::Element(None)) => Err(Error::assertion(format!("lookup '{name}' matched no element"))),
			Some(Slot::Value(_)) => Err(Error::assertion(format!("slot '{name}' holds a script value, not an element"))),
			None => Err(Error::assertion(format!("slot '{name}' was never filled"))),
		}
	}

	fn value(&self, name: &str) -> Result<&Value> {
		match self.0.get(name) {
			Some(Slot::Value(value)) => Ok(value),
			Some(Slot::Element(_)) => Err(Error::assertion(format!("slot '{name}' holds an element, not a value"))),
			None => Err(Error::assertion(format!("slot '{name}' was never filled"))),
		}
	}

	fn put(&mut self, name: &str, slot: Slot) {
		self.0.insert(name.to_string(), slot);
	}
}

/// Executes scenarios step by step against one session.
#[derive(Debug, Clone, Default)]
pub struct Runner {
	options: RunOptions,
}

impl Runner {
	pub fn new(options: RunOptions) -> Self {
		Self { options }
	}

	/// Runs every scenario in order.
	///
	/// A failed scenario does not stop the suite. A fatal session failure
	/// does: the scenarios after it are reported as skipped.
	pub async fn run_suite<A: Automation>(&self, session: &mut Session<A>, suite: &Suite) -> SuiteReport {
		let started = Instant::now();
		info!(target: "wd", suite = %suite.name, scenarios = suite.scenarios.len(), "suite started");

		let mut scenarios = Vec::with_capacity(suite.scenarios.len());
		let mut aborted = false;

		for scenario in &suite.scenarios {
			if aborted {
				scenarios.push(ScenarioReport::skipped(&scenario.name));
				continue;
			}
			let (report, fatal) = self.run(session, scenario).await;
			if fatal {
				warn!(target: "wd", scenario = %scenario.name, "session lost, skipping remaining scenarios");
				aborted = true;
			}
			scenarios.push(report);
		}

		let report = SuiteReport {
			name: suite.name.clone(),
			scenarios,
			aborted,
			duration_ms: elapsed_ms(started),
		};
		info!(
			target: "wd",
			suite = %report.name,
			passed = report.passed(),
			failed = report.failed(),
			skipped = report.skipped(),
			"suite finished"
		);
		report
	}

	/// Runs one scenario under the configured timeout.
	pub async fn run_scenario<A: Automation>(&self, session: &mut Session<A>, scenario: &Scenario) -> ScenarioReport {
		self.run(session, scenario).await.0
	}

	async fn run<A: Automation>(&self, session: &mut Session<A>, scenario: &Scenario) -> (ScenarioReport, bool) {
		let started = Instant::now();
		let limit = self.options.scenario_timeout;
		let mut completed = 0;

		info!(target: "wd", scenario = %scenario.name, steps = scenario.steps.len(), "scenario started");

		let outcome = match tokio::time::timeout(limit, self.execute(session, scenario, &mut completed)).await {
			Ok(result) => result,
			Err(_) => Err(Error::Timeout {
				ms: limit.as_millis() as u64,
				what: format!("scenario '{}'", scenario.name),
			}),
		};

		let fatal = outcome.as_ref().err().is_some_and(Error::is_fatal);
		let failure = outcome.err().map(|err| {
			let step_name = scenario.steps.get(completed).map(Step::describe);
			warn!(
				target: "wd",
				scenario = %scenario.name,
				step = completed,
				step_name = step_name.as_deref().unwrap_or("-"),
				kind = %err.kind(),
				error = %err,
				"scenario failed"
			);
			Failure {
				kind: err.kind(),
				step: step_name.as_ref().map(|_| completed),
				step_name,
				message: err.to_string(),
			}
		});

		let status = if failure.is_some() {
			ScenarioStatus::Failed
		} else {
			info!(target: "wd", scenario = %scenario.name, "scenario passed");
			ScenarioStatus::Passed
		};

		let report = ScenarioReport {
			name: scenario.name.clone(),
			status,
			steps_run: completed,
			duration_ms: elapsed_ms(started),
			failure,
		};
		(report, fatal)
	}

	async fn execute<A: Automation>(&self, session: &mut Session<A>, scenario: &Scenario, completed: &mut usize) -> Result<()> {
		let mut slots = Slots::default();
		for (index, step) in scenario.steps.iter().enumerate() {
			debug!(target: "wd", scenario = %scenario.name, index, step = %step, "step");
			self.step(session, step, &mut slots).await?;
			*completed = index + 1;
		}
		Ok(())
	}

	async fn step<A: Automation>(&self, session: &mut Session<A>, step: &Step, slots: &mut Slots) -> Result<()> {
		match step {
			Step::AssertSession => {
				if !session.is_open() {
					return Err(Error::assertion("session is not open"));
				}
			}
			Step::AssertPresent { slot } => {
				slots.element(slot)?;
			}
			Step::AssertEquals { slot, expected } => {
				let actual = slots.value(slot)?;
				if actual != expected {
					return Err(Error::assertion(format!("expected {slot} to equal {expected}, got {actual}")));
				}
			}
			Step::AssertVersion { slot } => {
				let expected = self
					.options
					.expected_version
					.as_deref()
					.ok_or_else(|| Error::assertion("no expected runtime version configured"))?;
				let actual = slots.value(slot)?;
				if actual.as_str() != Some(expected) {
					return Err(Error::assertion(format!("expected runtime version \"{expected}\", got {actual}")));
				}
			}
			Step::SwitchTo { label } => {
				session.switch_to_labeled(label, &self.options.switch).await?;
			}
			Step::Find { slot, locator } => {
				let found = session.find_first(locator).await?;
				slots.put(slot, Slot::Element(found));
			}
			Step::Click { slot } => {
				let element = slots.element(slot)?;
				session.click(element).await?;
			}
			Step::Execute { script, args, store } => {
				let value = session.execute(script, args.clone()).await?;
				if let Some(slot) = store {
					slots.put(slot, Slot::Value(value));
				}
			}
			Step::ExecuteAsync { script, args, store } => {
				let value = session.execute_async(script.as_str(), args.clone()).await?;
				if let Some(slot) = store {
					slots.put(slot, Slot::Value(value));
				}
			}
			Step::Wait { ms } => session.sleep(Duration::from_millis(*ms)).await,
		}
		Ok(())
	}
}

fn elapsed_ms(started: Instant) -> u64 {
	started.elapsed().as_millis() as u64
}
