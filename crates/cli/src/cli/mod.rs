
use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;
use crate::output::OutputFormat;

/// Root CLI for wd.
#[derive(Parser, Debug)]
#[command(name = "wd")]
#[command(about = "Run scripted WebDriver scenarios against desktop web runtimes")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv wire traces)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	/// Harness config file (defaults to ./wd.json when present)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// WebDriver endpoint, overrides remoteDriverUrl
	#[arg(long, global = true, value_name = "URL")]
	pub driver_url: Option<String>,

	/// Per-scenario and session timeout in milliseconds, overrides testTimeout
	#[arg(long, global = true, value_name = "MS")]
	pub timeout_ms: Option<u64>,

	/// Runtime version assert_version steps expect
	#[arg(long, global = true, value_name = "VERSION")]
	pub expected_version: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

impl Cli {
	pub fn overrides(&self) -> Overrides {
		Overrides {
			driver_url: self.driver_url.clone(),
			timeout_ms: self.timeout_ms,
			expected_version: self.expected_version.clone(),
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run a scenario suite (the built-in Hello OpenFin suite by default).
	Run(RunArgs),
	/// List open windows with their titles.
	Windows,
	/// Evaluate a script in the runtime.
	Eval(EvalArgs),
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Run(_) => "run",
			Commands::Windows => "windows",
			Commands::Eval(_) => "eval",
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
	/// JSON suite file to run instead of the built-in suite.
	#[arg(long, value_name = "FILE")]
	pub suite: Option<PathBuf>,

	/// Also write the suite report as JSON to this file.
	#[arg(long, value_name = "FILE")]
	pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
	/// Script body. With --async the completion callback is bound as `callback`.
	#[arg(value_name = "SCRIPT")]
	pub script: String,

	/// Run as an asynchronous script that reports through its callback.
	#[arg(long = "async")]
	pub asynchronous: bool,

	/// Switch to the window with this title first.
	#[arg(long, value_name = "TITLE")]
	pub window: Option<String>,

	/// JSON argument passed to the script (repeatable).
	#[arg(long = "arg", value_name = "JSON")]
	pub args: Vec<String>,
}

/// Help colours in cargo's style.
fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Cyan.on_default())
}
