//! stderr logging for the `wd` binary.
//!
//! Library events are emitted under the `wd` target. Reports go to stdout,
//! so logs never mix with the envelope.

use tracing_subscriber::EnvFilter;

/// Filter for a `-v` count. `RUST_LOG` replaces it entirely.
fn directives(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "error,wd=off",
		1 => "warn,wd=info",
		2 => "warn,wd=debug",
		_ => "info,wd=trace",
	}
}

pub fn init_logging(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbosity > 1)
		.compact()
		.init();
}

#[cfg(test)]
mod tests {
	use tracing_subscriber::EnvFilter;

	use super::directives;

	#[test]
	fn every_verbosity_has_a_valid_filter() {
		for verbosity in 0..=4 {
			let filter = directives(verbosity);
			assert!(EnvFilter::try_new(filter).is_ok(), "{filter}");
		}
	}

	#[test]
	fn library_target_is_silent_by_default() {
		assert!(directives(0).contains("wd=off"));
		assert!(directives(1).contains("wd=info"));
		assert_eq!(directives(7), directives(3));
	}
}
