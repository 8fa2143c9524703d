//! Command implementations.
//!
//! Each command opens its own session, does its work and quits the session
//! again before reporting, whether or not the work succeeded.

mod eval;
mod run;
mod windows;

use tracing::warn;
use wd::{RemoteSession, Session};

use crate::cli::{Cli, Commands};
use crate::config::HarnessConfig;
use crate::error::{Result, WdError};
use crate::output::EffectiveConfig;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let format = cli.format;
	let mut config = HarnessConfig::load(cli.config.as_deref())?;
	config.apply(&cli.overrides());

	match cli.command {
		Commands::Run(args) => run::execute(&config, args, format).await,
		Commands::Windows => windows::execute(&config, format).await,
		Commands::Eval(args) => eval::execute(&config, args, format).await,
	}
}

async fn start_session(config: &HarnessConfig) -> Result<Session<RemoteSession>> {
	let options = config.remote_options();
	let endpoint = options.endpoint.clone();
	let remote = RemoteSession::start(options)
		.await
		.map_err(|source| WdError::SessionStart { endpoint, source })?;
	Ok(Session::new(remote))
}

/// Quits `session`, logging instead of failing; returns the error text if any.
async fn close_session(session: &mut Session<RemoteSession>) -> Option<String> {
	match session.quit().await {
		Ok(()) => None,
		Err(err) => {
			warn!(target: "wd", error = %err, "failed to quit session");
			Some(err.to_string())
		}
	}
}

fn effective_config(config: &HarnessConfig, session: &Session<RemoteSession>) -> EffectiveConfig {
	EffectiveConfig {
		endpoint: config.remote_driver_url.clone(),
		timeout_ms: config.test_timeout,
		dialect: Some(format!("{:?}", session.driver().dialect()).to_lowercase()),
		expected_version: config.expected_runtime_version.clone(),
	}
}
