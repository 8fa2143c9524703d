use async_trait::async_trait;
use serde_json::Value;
use wd_protocol::{By, ElementRef, WindowHandle};
use wd_runtime::Result;

/// Operations the harness needs from an automation session.
///
/// All calls target the driver's current window. Implementations report
/// failures as [`wd_runtime::Error`]; [`Session`](crate::Session) lifts them
/// into session errors.
#[async_trait]
pub trait Automation: Send + Sync {
	/// Returns a snapshot of all window handles. Order is not stable across calls.
	async fn window_handles(&self) -> Result<Vec<WindowHandle>>;

	/// Makes `handle` the current window.
	async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()>;

	/// Returns the title of the current window.
	async fn title(&self) -> Result<String>;

	/// Returns every element in the current window matching `by` (possibly none).
	async fn find_elements(&self, by: &By) -> Result<Vec<ElementRef>>;

	/// Clicks `element`.
	async fn click(&self, element: &ElementRef) -> Result<()>;

	/// Runs `script` synchronously and returns its value.
	async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value>;

	/// Runs `script` with a completion callback appended to `arguments` and
	/// returns the value the script passes to it.
	async fn execute_async(&self, script: &str, args: Vec<Value>) -> Result<Value>;

	/// Ends the session.
	async fn quit(&self) -> Result<()>;
}
