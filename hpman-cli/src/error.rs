//! Error types for `hpman-cli`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `hpman-cli` pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// Parsing or resolving hyperparameters failed.
    #[error(transparent)]
    Hpman(#[from] hpman::HpmanError),

    /// Settings could not be merged or extracted.
    #[error("invalid settings: {0}")]
    Settings(Box<figment::Error>),

    /// The placeholder setting is not an identifier.
    #[error("placeholder '{0}' is not a valid identifier")]
    InvalidPlaceholder(String),

    /// An explicitly requested settings file does not exist.
    #[error("settings file {path} does not exist")]
    MissingConfig {
        /// Requested path.
        path: Utf8PathBuf,
    },

    /// A `--set` argument lacks `NAME=VALUE` form.
    #[error("invalid assignment '{0}'; expected NAME=VALUE")]
    InvalidAssignment(String),

    /// An overrides file could not be parsed into a table.
    #[error("failed to load overrides from {path}: {source}")]
    Overrides {
        /// Overrides file.
        path: Utf8PathBuf,
        /// Parse failure.
        #[source]
        source: Box<figment::Error>,
    },

    /// Output could not be serialised.
    #[error("failed to render JSON: {0}")]
    Render(#[from] serde_json::Error),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading or writing failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Settings(Box::new(err))
    }
}
