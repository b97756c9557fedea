//! Command-line interface definitions for `hpman-cli`.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Output formats supported by `hpman-cli`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `name = value` line per hyperparameter.
    #[default]
    Values,
    /// Flat name to value mapping as JSON.
    Json,
    /// Nested tree as JSON.
    Tree,
    /// Every recorded occurrence with its priority and location.
    Occurrences,
}

impl OutputFormat {
    /// Returns the CLI-friendly string for this output format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Values => "values",
            Self::Json => "json",
            Self::Tree => "tree",
            Self::Occurrences => "occurrences",
        }
    }
}

/// Parsed CLI arguments for `hpman-cli`.
#[derive(Debug, Parser)]
#[command(name = "hpman-cli")]
#[command(about = "List and override the hyperparameters declared in Python sources")]
#[command(version)]
pub struct Args {
    /// TOML settings file (defaults to `hpman.toml` when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,
    /// Identifier marking hyperparameter calls.
    #[arg(long, value_name = "NAME")]
    pub placeholder: Option<String>,
    /// Separator between name segments.
    #[arg(long, value_name = "CHAR")]
    pub separator: Option<char>,
    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Mark dict values in tree output so they survive a round trip.
    #[arg(long = "annotate-dicts")]
    pub should_annotate_dicts: bool,
    /// TOML or JSON file of nested overrides (repeatable).
    #[arg(long = "overrides", value_name = "FILE")]
    pub override_files: Vec<Utf8PathBuf>,
    /// Single override, the value read as a Python literal (repeatable).
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub assignments: Vec<String>,
    /// Source files or directories to scan.
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<Utf8PathBuf>,
}
