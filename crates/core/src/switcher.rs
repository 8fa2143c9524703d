//! Selecting a window by its title.
//!
//! Windows of the application under test appear asynchronously: when a
//! scenario asks for one, its handle may not exist yet, or it may exist
//! with a placeholder title. Each round therefore re-enumerates all handles
//! from scratch instead of re-checking an old snapshot. The loop is bounded
//! by [`SwitchPolicy`]; an outer scenario timeout may still cut it short.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};
use wd_protocol::WindowHandle;

use crate::automation::Automation;
use crate::error::{Error, Result};
use crate::session::Session;

/// Retry budget for [`switch_to_labeled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchPolicy {
	/// Maximum number of enumeration rounds. Zero is treated as one.
	pub max_rounds: u32,
	/// Pause between rounds in milliseconds.
	pub poll_interval_ms: u64,
	/// Optional wall-clock bound for the whole call in milliseconds.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deadline_ms: Option<u64>,
}

impl Default for SwitchPolicy {
	fn default() -> Self {
		Self {
			max_rounds: 50,
			poll_interval_ms: 100,
			deadline_ms: None,
		}
	}
}

impl SwitchPolicy {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn deadline(&self) -> Option<Duration> {
		self.deadline_ms.map(Duration::from_millis)
	}
}

/// Switches `session` to the first window whose title equals `label`.
///
/// Every round enumerates the handles, switches to each in order and reads
/// its title. Handles that vanish between enumeration and switch are
/// skipped. On success the matching window is current; on
/// [`Error::NotFound`] the session is left on whichever window was
/// inspected last.
pub async fn switch_to_labeled<A: Automation>(session: &mut Session<A>, label: &str, policy: &SwitchPolicy) -> Result<WindowHandle> {
	let started = Instant::now();
	let max_rounds = policy.max_rounds.max(1);
	let interval = policy.poll_interval();
	let mut last_seen = Vec::new();
	let mut rounds = 0;

	while rounds < max_rounds {
		rounds += 1;
		last_seen.clear();

		let handles = session.contexts().await?;
		for handle in handles {
			match inspect(session, &handle).await {
				Ok(Some(title)) if title == label => {
					info!(target: "wd", handle = %handle, label, rounds, "switched to window");
					return Ok(handle);
				}
				Ok(Some(title)) => last_seen.push(title),
				Ok(None) => debug!(target: "wd", handle = %handle, "window closed before inspection"),
				Err(err) => return Err(err),
			}
		}

		debug!(target: "wd", label, round = rounds, seen = ?last_seen, "no matching window yet");

		if rounds == max_rounds {
			break;
		}

		let pause = match policy.deadline() {
			Some(deadline) => {
				let elapsed = started.elapsed();
				if elapsed >= deadline {
					break;
				}
				interval.min(deadline - elapsed)
			}
			None => interval,
		};
		if !pause.is_zero() {
			tokio::time::sleep(pause).await;
		}
	}

	Err(Error::NotFound {
		label: label.to_string(),
		rounds,
		last_seen,
	})
}

/// Switches to `handle` and reads its title; `None` if the window is gone.
async fn inspect<A: Automation>(session: &mut Session<A>, handle: &WindowHandle) -> Result<Option<String>> {
	match session.switch_to(handle).await {
		Ok(()) => {}
		Err(err) if err.is_no_such_window() => return Ok(None),
		Err(err) => return Err(err),
	}
	match session.title().await {
		Ok(title) => Ok(Some(title)),
		Err(err) if err.is_no_such_window() => Ok(None),
		Err(err) => Err(err),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{Change, MockSession};

	fn quick(max_rounds: u32) -> SwitchPolicy {
		SwitchPolicy {
			max_rounds,
			poll_interval_ms: 0,
			deadline_ms: None,
		}
	}

	#[tokio::test]
	async fn polls_until_target_window_appears() {
		let mock = MockSession::new().with_window("1", "Loading").schedule(2, Change::open("2", "Target"));
		let mut session = Session::new(mock.clone());

		let handle = switch_to_labeled(&mut session, "Target", &quick(10)).await.unwrap();

		assert_eq!(handle.as_str(), "2");
		assert_eq!(session.current_context().map(WindowHandle::as_str), Some("2"));
		assert_eq!(mock.current().as_ref().map(WindowHandle::as_str), Some("2"));
		assert_eq!(mock.enumerations(), 2, "first snapshot had no match, second did");
	}

	#[tokio::test]
	async fn waits_for_a_placeholder_title_to_settle() {
		let mock = MockSession::new()
			.with_window("main", "Hello OpenFin")
			.with_window("cpu", "about:blank")
			.schedule(3, Change::retitle("cpu", "Hello OpenFin CPU Info"));
		let mut session = Session::new(mock.clone());

		let handle = switch_to_labeled(&mut session, "Hello OpenFin CPU Info", &quick(10)).await.unwrap();
		assert_eq!(handle.as_str(), "cpu");
		assert_eq!(mock.enumerations(), 3);
	}

	#[tokio::test]
	async fn stops_at_first_match_in_enumeration_order() {
		let mock = MockSession::new()
			.with_window("a", "Other")
			.with_window("b", "Target")
			.with_window("c", "Target");
		let mut session = Session::new(mock.clone());

		let handle = switch_to_labeled(&mut session, "Target", &quick(1)).await.unwrap();
		assert_eq!(handle.as_str(), "b");
		assert_eq!(mock.switches(), ["a", "b"]);
	}

	#[tokio::test]
	async fn success_never_leaves_a_mismatched_window_current() {
		let mock = MockSession::new()
			.with_window("x", "Alpha")
			.with_window("y", "Beta")
			.schedule(4, Change::open("z", "Gamma"));
		let mut session = Session::new(mock.clone());

		switch_to_labeled(&mut session, "Gamma", &quick(10)).await.unwrap();
		assert_eq!(session.title().await.unwrap(), "Gamma");
	}

	#[tokio::test]
	async fn gives_up_after_max_rounds() {
		let mock = MockSession::new().with_window("1", "Loading");
		let mut session = Session::new(mock.clone());

		let err = switch_to_labeled(&mut session, "Target", &quick(3)).await.unwrap_err();
		match err {
			Error::NotFound { label, rounds, last_seen } => {
				assert_eq!(label, "Target");
				assert_eq!(rounds, 3);
				assert_eq!(last_seen, ["Loading"]);
			}
			other => panic!("expected NotFound, got {other:?}"),
		}
		assert_eq!(mock.enumerations(), 3);
	}

	#[tokio::test]
	async fn zero_rounds_still_enumerates_once() {
		let mock = MockSession::new().with_window("1", "Target");
		let mut session = Session::new(mock);
		assert!(switch_to_labeled(&mut session, "Target", &quick(0)).await.is_ok());
	}

	#[tokio::test(start_paused = true)]
	async fn deadline_bounds_the_call() {
		let mock = MockSession::new().with_window("1", "Loading");
		let mut session = Session::new(mock.clone());
		let policy = SwitchPolicy {
			max_rounds: u32::MAX,
			poll_interval_ms: 100,
			deadline_ms: Some(1_000),
		};

		let started = Instant::now();
		let err = switch_to_labeled(&mut session, "Target", &policy).await.unwrap_err();

		assert!(matches!(err, Error::NotFound { .. }));
		assert!(started.elapsed() >= Duration::from_millis(1_000));
		assert!(started.elapsed() < Duration::from_millis(1_200));
		assert!((10..=12).contains(&mock.enumerations()), "enumerated {} times", mock.enumerations());
	}

	#[tokio::test]
	async fn empty_enumeration_counts_as_a_round() {
		let mock = MockSession::new().schedule(2, Change::open("late", "Target"));
		let mut session = Session::new(mock.clone());

		let handle = switch_to_labeled(&mut session, "Target", &quick(5)).await.unwrap();
		assert_eq!(handle.as_str(), "late");
	}

	#[tokio::test]
	async fn skips_windows_that_close_before_inspection() {
		let mock = MockSession::new()
			.with_window("stale", "Splash")
			.with_window("main", "Hello OpenFin")
			.stale_handle("stale");
		let mut session = Session::new(mock.clone());

		let handle = switch_to_labeled(&mut session, "Hello OpenFin", &quick(1)).await.unwrap();
		assert_eq!(handle.as_str(), "main");
	}

	#[tokio::test]
	async fn other_session_failures_propagate() {
		let mock = MockSession::new().with_window("1", "Loading").fail_op("title", "javascript error");
		let mut session = Session::new(mock);

		let err = switch_to_labeled(&mut session, "Target", &quick(5)).await.unwrap_err();
		assert!(matches!(err, Error::Session(ref e) if e.error_name() == Some("javascript error")));
	}

	#[test]
	fn policy_deserializes_with_defaults() {
		let policy: SwitchPolicy = serde_json::from_str(r#"{"maxRounds": 5}"#).unwrap();
		assert_eq!(policy.max_rounds, 5);
		assert_eq!(policy.poll_interval(), Duration::from_millis(100));
		assert_eq!(policy.deadline(), None);
	}
}
