//! Asynchronous script results.

use std::future::{Future, IntoFuture};

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::Result;

/// Result of an asynchronous script injection.
///
/// Resolves exactly once, with the value the injected script passed to its
/// completion callback. Awaiting consumes the handle.
#[must_use = "a pending script does nothing unless awaited"]
pub struct PendingScript<'a> {
	inner: BoxFuture<'a, Result<Value>>,
}

impl<'a> PendingScript<'a> {
	pub(crate) fn new(future: impl Future<Output = Result<Value>> + Send + 'a) -> Self {
		Self { inner: Box::pin(future) }
	}
}

impl<'a> IntoFuture for PendingScript<'a> {
	type Output = Result<Value>;
	type IntoFuture = BoxFuture<'a, Result<Value>>;

	fn into_future(self) -> Self::IntoFuture {
		self.inner
	}
}

impl std::fmt::Debug for PendingScript<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("PendingScript")
	}
}

/// Prefixes `body` with a binding of the driver-supplied completion callback
/// to `callback`.
///
/// ```text
/// with_callback("fin.desktop.System.getVersion(callback);")
/// ```
pub fn with_callback(body: &str) -> String {
	format!("var callback = arguments[arguments.length - 1];{body}")
}
