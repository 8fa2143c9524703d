use wd::{RemoteSession, Session};

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::output::{self, OutputFormat, ResultBuilder, WindowInfo, WindowsData};

pub(super) async fn execute(config: &HarnessConfig, format: OutputFormat) -> Result<()> {
	let mut session = super::start_session(config).await?;
	let listed = list(&mut session).await;
	let effective = super::effective_config(config, &session);
	let quit_error = super::close_session(&mut session).await;
	let windows = listed?;

	let mut builder = ResultBuilder::new("windows").config(effective);
	if let Some(message) = quit_error {
		builder = builder.warning("quit", message);
	}
	let result = builder
		.data(WindowsData {
			count: windows.len(),
			windows,
		})
		.build();

	output::print_result(&result, format);
	Ok(())
}

/// Visits every window once; windows that close mid-listing are left out.
async fn list(session: &mut Session<RemoteSession>) -> Result<Vec<WindowInfo>> {
	let mut windows = Vec::new();
	for handle in session.contexts().await? {
		let title = match session.switch_to(&handle).await {
			Ok(()) => session.title().await,
			Err(err) => Err(err),
		};
		match title {
			Ok(title) => windows.push(WindowInfo {
				handle: handle.to_string(),
				title,
			}),
			Err(wd::Error::Session(ref err)) if err.is_no_such_window() => continue,
			Err(err) => return Err(err.into()),
		}
	}
	Ok(windows)
}
