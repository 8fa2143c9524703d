//! Harness configuration.
//!
//! Read from a JSON file (`wd.json` in the working directory unless
//! `--config` names another), then overridden by command-line flags.
//!
//! ```json
//! {
//!   "remoteDriverUrl": "http://localhost:9515",
//!   "testTimeout": 60000,
//!   "expectedRuntimeVersion": "3.0.0",
//!   "desiredCapabilities": {
//!     "chromeOptions": { "binary": "RunOpenFin.bat", "args": ["--config=app.json"] }
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use wd::{RemoteOptions, RunOptions, SwitchPolicy, Timeouts};

use crate::error::{Result, WdError};

pub const DEFAULT_CONFIG_FILE: &str = "wd.json";
pub const DEFAULT_DRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_TEST_TIMEOUT_MS: u64 = 60_000;

/// Extra client-side slack on top of the session timeouts, so the driver
/// reports its own script timeout before the HTTP request is abandoned.
const REQUEST_SLACK: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HarnessConfig {
	pub remote_driver_url: String,
	/// Overall per-scenario timeout in milliseconds; also used for the
	/// implicit-wait, page-load and script timeouts of the session.
	pub test_timeout: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expected_runtime_version: Option<String>,
	/// Capabilities passed to the driver verbatim (`chromeOptions` etc.).
	pub desired_capabilities: Map<String, Value>,
	pub switch: SwitchSettings,
	pub windows: WindowTitles,
}

impl Default for HarnessConfig {
	fn default() -> Self {
		Self {
			remote_driver_url: DEFAULT_DRIVER_URL.to_string(),
			test_timeout: DEFAULT_TEST_TIMEOUT_MS,
			expected_runtime_version: None,
			desired_capabilities: Map::new(),
			switch: SwitchSettings::default(),
			windows: WindowTitles::default(),
		}
	}
}

/// Window titles used by the built-in suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowTitles {
	pub main: String,
	pub cpu_info: String,
}

impl Default for WindowTitles {
	fn default() -> Self {
		Self {
			main: "Hello OpenFin".to_string(),
			cpu_info: "Hello OpenFin CPU Info".to_string(),
		}
	}
}

/// Window-switch budget as written in the file.
///
/// Unset fields fall back to polling every 100 ms, without a round limit,
/// until the test timeout has elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchSettings {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_rounds: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub poll_interval_ms: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deadline_ms: Option<u64>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub driver_url: Option<String>,
	pub timeout_ms: Option<u64>,
	pub expected_version: Option<String>,
}

impl HarnessConfig {
	/// Loads `path`, or the default file when `path` is `None`.
	///
	/// A missing default file yields the defaults; a missing explicit file is
	/// an error.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(path) => Self::from_file(path),
			None => {
				let path = Path::new(DEFAULT_CONFIG_FILE);
				if path.exists() {
					Self::from_file(path)
				} else {
					debug!(target: "wd", "no {DEFAULT_CONFIG_FILE} found, using defaults");
					Ok(Self::default())
				}
			}
		}
	}

	pub fn from_file(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|source| WdError::ConfigRead {
			path: PathBuf::from(path),
			source,
		})?;
		let config = serde_json::from_str(&content).map_err(|source| WdError::ConfigParse {
			path: PathBuf::from(path),
			source,
		})?;
		debug!(target: "wd", path = %path.display(), "loaded config");
		Ok(config)
	}

	pub fn apply(&mut self, overrides: &Overrides) {
		if let Some(ref url) = overrides.driver_url {
			self.remote_driver_url = url.clone();
		}
		if let Some(ms) = overrides.timeout_ms {
			self.test_timeout = ms;
		}
		if let Some(ref version) = overrides.expected_version {
			self.expected_runtime_version = Some(version.clone());
		}
	}

	pub fn test_timeout(&self) -> Duration {
		Duration::from_millis(self.test_timeout)
	}

	pub fn remote_options(&self) -> RemoteOptions {
		RemoteOptions::new(&self.remote_driver_url)
			.capabilities(self.desired_capabilities.clone())
			.timeouts(Timeouts::uniform(self.test_timeout))
			.request_timeout(self.test_timeout() + REQUEST_SLACK)
	}

	pub fn switch_policy(&self) -> SwitchPolicy {
		SwitchPolicy {
			max_rounds: self.switch.max_rounds.unwrap_or(u32::MAX),
			poll_interval_ms: self.switch.poll_interval_ms.unwrap_or(SwitchPolicy::default().poll_interval_ms),
			deadline_ms: self.switch.deadline_ms.or(Some(self.test_timeout)),
		}
	}

	pub fn run_options(&self) -> RunOptions {
		RunOptions {
			scenario_timeout: self.test_timeout(),
			switch: self.switch_policy(),
			expected_version: self.expected_runtime_version.clone(),
		}
	}
}
