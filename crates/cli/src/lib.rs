//! `wd` command-line runner.
//!
//! Loads a [`config::HarnessConfig`], opens one WebDriver session and runs a
//! scenario suite (the built-in Hello OpenFin suite or one loaded from JSON).

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod suites;
