//! Wire types for the W3C WebDriver protocol.
//!
//! This crate contains the serde-serializable shapes exchanged with a remote
//! WebDriver endpoint (chromedriver and the embedded-runtime builds of it).
//! Both the W3C dialect and the older JSON wire dialect are accepted on the
//! way in; requests are written so either dialect understands them.
//!
//! Types in this crate are plain data. Command routing lives in `wd-runtime`
//! and the ergonomic session API in `wd-rs`.

pub mod capabilities;
pub mod error;
pub mod types;

pub use capabilities::*;
pub use error::*;
pub use types::*;
