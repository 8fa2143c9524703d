//! Scripted WebDriver scenarios for desktop web runtimes.
//!
//! The crate is built around a narrow [`Automation`] capability (window
//! enumeration, switching, titles, element lookup, clicks and script
//! injection). [`RemoteSession`] implements it over a WebDriver endpoint and
//! [`testing::MockSession`] implements it in memory.
//!
//! On top of that sit:
//! - [`Session`], which tracks the current context as an explicit field,
//! - [`switch_to_labeled`], the bounded "find the window with this title" loop,
//! - [`Runner`], which executes [`Suite`]s of [`Scenario`]s step by step.

mod automation;
mod error;
mod remote;
mod script;
mod session;
mod switcher;

pub mod scenario;
pub mod testing;

pub use automation::Automation;
pub use error::{Error, FailureKind, Result};
pub use remote::{RemoteOptions, RemoteSession};
pub use scenario::{Failure, RunOptions, Runner, Scenario, ScenarioReport, ScenarioStatus, Step, Suite, SuiteReport};
pub use script::{PendingScript, with_callback};
pub use session::Session;
pub use switcher::{SwitchPolicy, switch_to_labeled};
pub use wd_protocol::{By, ElementRef, Timeouts, WindowHandle};
pub use wd_protocol;
pub use wd_runtime;
