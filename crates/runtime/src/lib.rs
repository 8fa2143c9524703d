//! WebDriver runtime: HTTP connection, command routing and error types.
//!
//! This crate speaks to a remote driver on behalf of `wd-rs`. It knows how
//! each [`Command`] maps onto the W3C and legacy JSON wire endpoints and how
//! driver failures are reported, but keeps no session state itself.

pub mod command;
pub mod connection;
pub mod error;

pub use command::{Command, Dialect, Route};
pub use connection::Connection;
pub use error::{Error, Result};
pub use wd_protocol;
