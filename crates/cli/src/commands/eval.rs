use serde_json::Value;
use wd::{RemoteSession, Session, with_callback};

use crate::cli::EvalArgs;
use crate::config::HarnessConfig;
use crate::error::{Result, WdError};
use crate::output::{self, CommandInputs, EvalData, OutputFormat, ResultBuilder};

pub(super) async fn execute(config: &HarnessConfig, args: EvalArgs, format: OutputFormat) -> Result<()> {
	let script_args = parse_args(&args.args)?;

	let mut session = super::start_session(config).await?;
	let evaluated = evaluate(&mut session, config, &args, script_args).await;
	let effective = super::effective_config(config, &session);
	let quit_error = super::close_session(&mut session).await;
	let (result, window) = evaluated?;

	let mut builder = ResultBuilder::new("eval")
		.inputs(CommandInputs {
			script: Some(args.script.clone()),
			window: args.window.clone(),
			..Default::default()
		})
		.config(effective);
	if let Some(message) = quit_error {
		builder = builder.warning("quit", message);
	}
	let result = builder
		.data(EvalData {
			result,
			asynchronous: args.asynchronous,
			window,
		})
		.build();

	output::print_result(&result, format);
	Ok(())
}

async fn evaluate(
	session: &mut Session<RemoteSession>,
	config: &HarnessConfig,
	args: &EvalArgs,
	script_args: Vec<Value>,
) -> Result<(Value, Option<String>)> {
	let window = match args.window {
		Some(ref title) => Some(session.switch_to_labeled(title, &config.switch_policy()).await?.to_string()),
		None => None,
	};

	let value = if args.asynchronous {
		session.execute_async(with_callback(&args.script), script_args).await?
	} else {
		session.execute(&args.script, script_args).await?
	};
	Ok((value, window))
}

fn parse_args(raw: &[String]) -> Result<Vec<Value>> {
	raw.iter()
		.map(|arg| serde_json::from_str(arg).map_err(|e| WdError::InvalidInput(format!("--arg {arg} is not valid JSON: {e}"))))
		.collect()
}
