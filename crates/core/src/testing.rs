//! In-memory automation double.
//!
//! [`MockSession`] implements [`Automation`] against a scripted set of
//! windows, so switcher and runner behaviour can be exercised without a
//! driver or a browser.
//!
//! ```ignore
//! use wd::testing::{Change, MockSession};
//!
//! let mock = MockSession::new()
//!     .with_window("1", "Loading")
//!     .schedule(2, Change::open("2", "Target"));
//! ```
//!
//! Clones share state, so a test can keep one clone for inspection while the
//! session under test owns another.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use wd_protocol::{self as protocol, By, ElementRef, Locator, WindowHandle};
use wd_runtime::{Error, Result};

use crate::automation::Automation;

/// A change to the window set, applied on a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
	Open { handle: String, title: String },
	Retitle { handle: String, title: String },
}

impl Change {
	pub fn open(handle: &str, title: &str) -> Self {
		Change::Open {
			handle: handle.to_string(),
			title: title.to_string(),
		}
	}

	pub fn retitle(handle: &str, title: &str) -> Self {
		Change::Retitle {
			handle: handle.to_string(),
			title: title.to_string(),
		}
	}
}

struct MockWindow {
	handle: WindowHandle,
	title: String,
	elements: Vec<(Locator, ElementRef)>,
}

#[derive(Default)]
struct MockState {
	windows: Vec<MockWindow>,
	current: Option<WindowHandle>,
	scheduled: Vec<(usize, Change)>,
	on_click: HashMap<String, Vec<Change>>,
	stale: HashSet<String>,
	scripts: HashMap<String, Value>,
	async_scripts: HashMap<String, Value>,
	async_delay: Option<Duration>,
	failures: HashMap<String, String>,
	disconnected: bool,
	enumerations: usize,
	switches: Vec<String>,
	clicks: Vec<String>,
	calls: Vec<String>,
	quit_count: usize,
}

impl MockState {
	fn apply(&mut self, change: Change) {
		match change {
			Change::Open { handle, title } => self.windows.push(MockWindow {
				handle: WindowHandle::new(handle),
				title,
				elements: Vec::new(),
			}),
			Change::Retitle { handle, title } => {
				if let Some(window) = self.window_mut(&handle) {
					window.title = title;
				}
			}
		}
	}

	fn window_mut(&mut self, handle: &str) -> Option<&mut MockWindow> {
		self.windows.iter_mut().find(|w| w.handle.as_str() == handle)
	}

	/// The driver starts out on the first window.
	fn current_window(&self) -> Result<&MockWindow> {
		let found = match &self.current {
			Some(handle) => self.windows.iter().find(|w| &w.handle == handle),
			None => self.windows.first(),
		};
		found.ok_or_else(|| remote(protocol::NO_SUCH_WINDOW, "no current window"))
	}
}

fn remote(error: &str, message: &str) -> Error {
	Error::Remote {
		error: error.to_string(),
		message: message.to_string(),
		stacktrace: None,
	}
}

/// Scripted [`Automation`] implementation.
#[derive(Clone, Default)]
pub struct MockSession {
	state: Arc<Mutex<MockState>>,
}

impl MockSession {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a window that exists from the start.
	pub fn with_window(self, handle: &str, title: &str) -> Self {
		self.state.lock().apply(Change::open(handle, title));
		self
	}

	/// Makes `element_id` the result of looking up `by` in window `handle`.
	pub fn with_element(self, handle: &str, by: By, element_id: &str) -> Self {
		if let Some(window) = self.state.lock().window_mut(handle) {
			window.elements.push((by.to_locator(), ElementRef::new(element_id)));
		}
		self
	}

	/// Value returned by the synchronous script `script`. Unknown scripts return null.
	pub fn with_script(self, script: &str, value: Value) -> Self {
		self.state.lock().scripts.insert(script.to_string(), value);
		self
	}

	/// Value the asynchronous script `script` passes to its callback.
	/// Unknown async scripts never call back and fail with `script timeout`.
	pub fn with_async_script(self, script: &str, value: Value) -> Self {
		self.state.lock().async_scripts.insert(script.to_string(), value);
		self
	}

	/// Delays every async script completion.
	pub fn with_async_delay(self, delay: Duration) -> Self {
		self.state.lock().async_delay = Some(delay);
		self
	}

	/// Applies `change` right before enumeration number `at` (1-based) is answered.
	pub fn schedule(self, at: usize, change: Change) -> Self {
		self.state.lock().scheduled.push((at, change));
		self
	}

	/// Applies `change` whenever `element_id` is clicked.
	pub fn on_click(self, element_id: &str, change: Change) -> Self {
		self.state
			.lock()
			.on_click
			.entry(element_id.to_string())
			.or_default()
			.push(change);
		self
	}

	/// Keeps reporting `handle` in enumerations while switching to it fails
	/// with `no such window`.
	pub fn stale_handle(self, handle: &str) -> Self {
		self.state.lock().stale.insert(handle.to_string());
		self
	}

	/// Makes every call of `op` fail with the W3C error `error`.
	///
	/// Ops: `window_handles`, `switch_to_window`, `title`, `find_elements`,
	/// `click`, `execute`, `execute_async`, `quit`.
	pub fn fail_op(self, op: &str, error: &str) -> Self {
		self.state.lock().failures.insert(op.to_string(), error.to_string());
		self
	}

	/// Drops the simulated transport; every later call fails fatally.
	pub fn disconnect(&self) {
		self.state.lock().disconnected = true;
	}

	/// Window the driver currently addresses.
	pub fn current(&self) -> Option<WindowHandle> {
		self.state.lock().current.clone()
	}

	pub fn enumerations(&self) -> usize {
		self.state.lock().enumerations
	}

	/// Handles passed to `switch_to_window`, in call order.
	pub fn switches(&self) -> Vec<String> {
		self.state.lock().switches.clone()
	}

	/// Ids of clicked elements, in call order.
	pub fn clicks(&self) -> Vec<String> {
		self.state.lock().clicks.clone()
	}

	/// Every call made, in order, as `op` or `op:detail`.
	pub fn calls(&self) -> Vec<String> {
		self.state.lock().calls.clone()
	}

	pub fn quit_count(&self) -> usize {
		self.state.lock().quit_count
	}

	pub fn window_titles(&self) -> Vec<String> {
		self.state.lock().windows.iter().map(|w| w.title.clone()).collect()
	}

	fn begin(&self, op: &str, detail: &str) -> Result<()> {
		let mut state = self.state.lock();
		state.calls.push(if detail.is_empty() { op.to_string() } else { format!("{op}:{detail}") });
		if state.disconnected {
			return Err(Error::TransportError("mock driver disconnected".to_string()));
		}
		if let Some(error) = state.failures.get(op) {
			return Err(remote(error, &format!("{op} failed")));
		}
		Ok(())
	}

	fn record(&self, entry: String) {
		self.state.lock().calls.push(entry);
	}
}

#[async_trait]
impl Automation for MockSession {
	async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
		self.begin("window_handles", "")?;
		let mut state = self.state.lock();
		state.enumerations += 1;
		let now = state.enumerations;

		let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut state.scheduled).into_iter().partition(|(at, _)| *at <= now);
		state.scheduled = later;
		for (_, change) in due {
			state.apply(change);
		}

		Ok(state.windows.iter().map(|w| w.handle.clone()).collect())
	}

	async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()> {
		self.begin("switch_to_window", handle.as_str())?;
		let mut state = self.state.lock();
		state.switches.push(handle.as_str().to_string());

		let exists = state.windows.iter().any(|w| &w.handle == handle);
		if !exists || state.stale.contains(handle.as_str()) {
			return Err(remote(protocol::NO_SUCH_WINDOW, &format!("window {handle} is closed")));
		}
		state.current = Some(handle.clone());
		Ok(())
	}

	async fn title(&self) -> Result<String> {
		self.begin("title", "")?;
		let state = self.state.lock();
		Ok(state.current_window()?.title.clone())
	}

	async fn find_elements(&self, by: &By) -> Result<Vec<ElementRef>> {
		self.begin("find_elements", &by.to_string())?;
		let state = self.state.lock();
		let locator = by.to_locator();
		let window = state.current_window()?;
		Ok(window
			.elements
			.iter()
			.filter(|(l, _)| *l == locator)
			.map(|(_, element)| element.clone())
			.collect())
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		self.begin("click", element.id())?;
		let mut state = self.state.lock();
		let attached = state.current_window()?.elements.iter().any(|(_, e)| e == element);
		if !attached {
			return Err(remote(
				protocol::STALE_ELEMENT_REFERENCE,
				&format!("element {element} is not attached to the current window"),
			));
		}

		state.clicks.push(element.id().to_string());
		let changes = state.on_click.get(element.id()).cloned().unwrap_or_default();
		for change in changes {
			state.apply(change);
		}
		Ok(())
	}

	async fn execute(&self, script: &str, _args: Vec<Value>) -> Result<Value> {
		self.begin("execute", script)?;
		let state = self.state.lock();
		state.current_window()?;
		Ok(state.scripts.get(script).cloned().unwrap_or(Value::Null))
	}

	async fn execute_async(&self, script: &str, _args: Vec<Value>) -> Result<Value> {
		self.begin("execute_async", script)?;
		let (result, delay) = {
			let state = self.state.lock();
			state.current_window()?;
			(state.async_scripts.get(script).cloned(), state.async_delay)
		};

		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		self.record("execute_async:done".to_string());

		result.ok_or_else(|| remote(protocol::SCRIPT_TIMEOUT, "script never invoked its callback"))
	}

	async fn quit(&self) -> Result<()> {
		self.begin("quit", "")?;
		let mut state = self.state.lock();
		state.quit_count += 1;
		state.windows.clear();
		state.current = None;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn scheduled_changes_apply_on_their_enumeration() {
		let mock = MockSession::new().with_window("1", "Loading").schedule(2, Change::open("2", "Target"));

		assert_eq!(mock.window_handles().await.unwrap().len(), 1);
		assert_eq!(mock.window_handles().await.unwrap().len(), 2);
		assert_eq!(mock.window_titles(), ["Loading", "Target"]);
	}

	#[tokio::test]
	async fn clicks_trigger_window_changes() {
		let mock = MockSession::new()
			.with_window("main", "Main")
			.with_element("main", By::id("open"), "el-open")
			.on_click("el-open", Change::open("popup", "Popup"));

		let button = mock.find_elements(&By::id("open")).await.unwrap().remove(0);
		mock.click(&button).await.unwrap();

		assert_eq!(mock.window_titles(), ["Main", "Popup"]);
		assert_eq!(mock.clicks(), ["el-open"]);
	}

	#[tokio::test]
	async fn elements_are_scoped_to_the_current_window() {
		let mock = MockSession::new()
			.with_window("a", "A")
			.with_window("b", "B")
			.with_element("b", By::id("close-app"), "el-close");

		assert!(mock.find_elements(&By::id("close-app")).await.unwrap().is_empty());
		mock.switch_to_window(&WindowHandle::new("b")).await.unwrap();
		assert_eq!(mock.find_elements(&By::id("close-app")).await.unwrap().len(), 1);

		mock.switch_to_window(&WindowHandle::new("a")).await.unwrap();
		let err = mock.click(&ElementRef::new("el-close")).await.unwrap_err();
		assert_eq!(err.error_name(), Some(protocol::STALE_ELEMENT_REFERENCE));
	}

	#[tokio::test]
	async fn disconnect_fails_every_call_fatally() {
		let mock = MockSession::new().with_window("a", "A");
		mock.disconnect();
		let err = mock.title().await.unwrap_err();
		assert!(err.is_fatal());
	}

	#[tokio::test]
	async fn unknown_async_script_times_out() {
		let mock = MockSession::new().with_window("a", "A");
		let err = mock.execute_async("noop", vec![]).await.unwrap_err();
		assert!(err.is_timeout());
	}
}
