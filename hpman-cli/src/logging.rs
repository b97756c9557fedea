//! Tracing subscriber setup for the binary.
//!
//! Events go to stderr so they never mix with rendered output. The filter is
//! read from `HPMAN_LOG` using `tracing-subscriber` directive syntax.

use tracing_subscriber::{EnvFilter, filter::ParseError, fmt, prelude::*};

use crate::error::CliError;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "HPMAN_LOG";

/// Filter used when `HPMAN_LOG` is unset or blank.
pub const DEFAULT_FILTER: &str = "warn";

fn filter_from(directives: Option<&str>) -> Result<EnvFilter, ParseError> {
    let chosen = directives
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(chosen)
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`CliError::Logging`] for an invalid filter or when a subscriber
/// is already installed.
pub fn init() -> Result<(), CliError> {
    let requested = std::env::var(LOG_ENV).ok();
    let filter =
        filter_from(requested.as_deref()).map_err(|err| CliError::Logging(Box::new(err)))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|err| CliError::Logging(Box::new(err)))
}
