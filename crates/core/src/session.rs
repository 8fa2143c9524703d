use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use wd_protocol::{By, ElementRef, WindowHandle};

use crate::automation::Automation;
use crate::error::{Error, Result};
use crate::script::PendingScript;
use crate::switcher::{SwitchPolicy, switch_to_labeled};

/// One automation connection plus the context it currently addresses.
///
/// The current window is tracked here rather than left implicit in the
/// driver, so independent scenario sequences can each hold their own
/// `Session` value. Operations that change context take `&mut self`.
pub struct Session<A> {
	driver: A,
	current: Option<WindowHandle>,
	open: bool,
}

impl<A: Automation> Session<A> {
	pub fn new(driver: A) -> Self {
		Self {
			driver,
			current: None,
			open: true,
		}
	}

	pub fn driver(&self) -> &A {
		&self.driver
	}

	/// Window made current by the last successful switch, if any.
	pub fn current_context(&self) -> Option<&WindowHandle> {
		self.current.as_ref()
	}

	/// Returns false once [`quit`](Self::quit) has been called.
	pub fn is_open(&self) -> bool {
		self.open
	}

	fn ensure_open(&self) -> Result<()> {
		if self.open { Ok(()) } else { Err(Error::SessionClosed) }
	}

	/// Enumerates all windows (a snapshot).
	pub async fn contexts(&self) -> Result<Vec<WindowHandle>> {
		self.ensure_open()?;
		Ok(self.driver.window_handles().await?)
	}

	/// Makes `handle` current. On failure the previous context stays recorded.
	pub async fn switch_to(&mut self, handle: &WindowHandle) -> Result<()> {
		self.ensure_open()?;
		self.driver.switch_to_window(handle).await?;
		self.current = Some(handle.clone());
		Ok(())
	}

	/// Switches to the first window titled `label`, see [`switch_to_labeled`].
	pub async fn switch_to_labeled(&mut self, label: &str, policy: &SwitchPolicy) -> Result<WindowHandle> {
		switch_to_labeled(self, label, policy).await
	}

	/// Title of the current window.
	pub async fn title(&self) -> Result<String> {
		self.ensure_open()?;
		Ok(self.driver.title().await?)
	}

	pub async fn find_elements(&self, by: &By) -> Result<Vec<ElementRef>> {
		self.ensure_open()?;
		Ok(self.driver.find_elements(by).await?)
	}

	/// First element matching `by`; `None` when nothing matches.
	pub async fn find_first(&self, by: &By) -> Result<Option<ElementRef>> {
		let elements = self.find_elements(by).await?;
		debug!(target: "wd", by = %by, matches = elements.len(), "find elements");
		Ok(elements.into_iter().next())
	}

	pub async fn click(&self, element: &ElementRef) -> Result<()> {
		self.ensure_open()?;
		Ok(self.driver.click(element).await?)
	}

	/// Runs `script` in the current window and returns its value.
	pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
		self.ensure_open()?;
		Ok(self.driver.execute(script, args).await?)
	}

	/// Injects `script` with a completion callback as its last argument.
	///
	/// The returned handle resolves once, when the script invokes the
	/// callback (or the driver's script timeout fires).
	pub fn execute_async(&self, script: impl Into<String>, args: Vec<Value>) -> PendingScript<'_> {
		let script = script.into();
		PendingScript::new(async move {
			self.ensure_open()?;
			Ok(self.driver.execute_async(&script, args).await?)
		})
	}

	pub async fn sleep(&self, duration: Duration) {
		tokio::time::sleep(duration).await;
	}

	/// Ends the session. Calling it again is a no-op.
	pub async fn quit(&mut self) -> Result<()> {
		if !self.open {
			return Ok(());
		}
		self.open = false;
		self.current = None;
		Ok(self.driver.quit().await?)
	}
}
