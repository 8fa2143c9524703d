//! Built-in suites.

use wd::{By, Scenario, Suite, with_callback};

use crate::config::HarnessConfig;

const VERSION_SCRIPT: &str = "fin.desktop.System.getVersion(function(v) { callback(v); });";
const EXIT_SCRIPT: &str = "fin.desktop.System.exit();";
const SETTLE_MS: u64 = 3_000;

/// Smoke suite for the Hello OpenFin demo application.
///
/// Window titles and the expected version come from `config`.
pub fn hello_openfin(config: &HarnessConfig) -> Suite {
	let titles = &config.windows;

	Suite::new("Hello OpenFin")
		.scenario(Scenario::new("Switch to Hello OpenFin Main window").assert_session().switch_to(&titles.main))
		.scenario(
			Scenario::new("Verify OpenFin Runtime Version")
				.assert_session()
				.execute_async(&with_callback(VERSION_SCRIPT), Some("version"))
				.assert_version("version"),
		)
		.scenario(
			Scenario::new("Click notification button")
				.assert_session()
				.find("notification", By::id("desktop-notification"))
				.assert_present("notification")
				.click("notification"),
		)
		.scenario(
			Scenario::new("Click CPU Info button")
				.assert_session()
				.find("cpu-info", By::id("cpu-info"))
				.assert_present("cpu-info")
				.click("cpu-info")
				.wait(SETTLE_MS),
		)
		.scenario(Scenario::new("Switch to CPU Info window").assert_session().switch_to(&titles.cpu_info))
		.scenario(
			Scenario::new("Click CPU Info Exit button")
				.assert_session()
				.find("exit", By::id("close-app"))
				.assert_present("exit")
				.click("exit")
				.wait(SETTLE_MS),
		)
		.scenario(Scenario::new("Exit OpenFin Runtime").assert_session().execute(EXIT_SCRIPT, None))
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use wd::testing::{Change, MockSession};
	use wd::{Runner, ScenarioStatus, Session, Step};

	use super::*;

	fn hello_app() -> MockSession {
		MockSession::new()
			.with_window("main", "Hello OpenFin")
			.with_window("cpu", "about:blank")
			.with_element("main", By::id("desktop-notification"), "el-notify")
			.with_element("main", By::id("cpu-info"), "el-cpu")
			.with_element("cpu", By::id("close-app"), "el-close")
			.on_click("el-cpu", Change::retitle("cpu", "Hello OpenFin CPU Info"))
			.with_async_script(&with_callback(VERSION_SCRIPT), json!("3.0.0"))
	}

	fn config(version: &str) -> HarnessConfig {
		HarnessConfig {
			expected_runtime_version: Some(version.to_string()),
			..HarnessConfig::default()
		}
	}

	#[test]
	fn every_scenario_checks_the_session_first() {
		let suite = hello_openfin(&HarnessConfig::default());
		assert_eq!(suite.scenarios.len(), 7);
		for scenario in &suite.scenarios {
			assert_eq!(scenario.steps.first(), Some(&Step::AssertSession), "{}", scenario.name);
		}
	}

	#[test]
	fn window_titles_come_from_config() {
		let mut config = HarnessConfig::default();
		config.windows.main = "My App".into();
		let suite = hello_openfin(&config);
		assert_eq!(suite.scenarios[0].steps[1], Step::SwitchTo { label: "My App".into() });
	}

	#[tokio::test(start_paused = true)]
	async fn full_suite_passes_against_the_demo_app() {
		let mock = hello_app();
		let mut session = Session::new(mock.clone());
		let config = config("3.0.0");

		let report = Runner::new(config.run_options()).run_suite(&mut session, &hello_openfin(&config)).await;

		assert!(report.is_success(), "{report:#?}");
		assert_eq!(mock.clicks(), ["el-notify", "el-cpu", "el-close"]);
		assert!(mock.calls().last().unwrap().starts_with("execute:fin.desktop.System.exit"));
	}

	#[tokio::test(start_paused = true)]
	async fn slow_main_window_is_found_within_the_test_timeout() {
		let mock = MockSession::new()
			.with_window("splash", "Loading")
			.schedule(60, Change::open("main", "Hello OpenFin"));
		let mut session = Session::new(mock.clone());
		let config = HarnessConfig::default();
		let suite = hello_openfin(&config);

		let started = tokio::time::Instant::now();
		let report = Runner::new(config.run_options()).run_scenario(&mut session, &suite.scenarios[0]).await;

		assert_eq!(report.status, ScenarioStatus::Passed, "{report:#?}");
		assert_eq!(mock.enumerations(), 60);
		assert!(started.elapsed() > std::time::Duration::from_secs(5));
		assert_eq!(session.current_context().map(|h| h.as_str()), Some("main"));
	}

	#[tokio::test(start_paused = true)]
	async fn missing_window_gives_up_at_the_test_timeout() {
		let mock = MockSession::new().with_window("splash", "Loading");
		let mut session = Session::new(mock);
		let config = HarnessConfig {
			test_timeout: 2_000,
			..HarnessConfig::default()
		};
		let suite = hello_openfin(&config);

		let started = tokio::time::Instant::now();
		let report = Runner::new(config.run_options()).run_scenario(&mut session, &suite.scenarios[0]).await;

		assert_eq!(report.status, ScenarioStatus::Failed);
		assert!(started.elapsed() <= std::time::Duration::from_millis(2_100));
	}

	#[tokio::test(start_paused = true)]
	async fn version_mismatch_fails_only_that_scenario() {
		let mut session = Session::new(hello_app());
		let config = config("9.9.9");

		let report = Runner::new(config.run_options()).run_suite(&mut session, &hello_openfin(&config)).await;

		assert_eq!(report.scenarios[1].status, ScenarioStatus::Failed);
		assert_eq!(report.failed(), 1);
		assert_eq!(report.passed(), 6);
	}
}
