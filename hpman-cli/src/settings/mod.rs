//! Layered settings for `hpman-cli`.
//!
//! Values are merged with `figment`, lowest precedence first: built-in
//! defaults, a TOML settings file, `HPMAN_*` environment variables and finally
//! command-line flags.

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    cli::{Args, OutputFormat},
    error::CliError,
    fs_helpers::read_text,
};

/// Settings file read from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "hpman.toml";

/// Prefix of the environment variables overriding settings.
pub const ENV_PREFIX: &str = "HPMAN_";

const SETTING_KEYS: [&str; 3] = ["placeholder", "separator", "format"];

/// Resolved settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Identifier marking hyperparameter calls.
    pub placeholder: String,
    /// Separator between name segments.
    pub separator: char,
    /// Output format.
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            placeholder: "_".to_owned(),
            separator: hpman::DEFAULT_SEPARATOR,
            format: OutputFormat::default(),
        }
    }
}

/// Flag values, serialised without the ones the user did not pass so they
/// do not mask lower layers.
#[derive(Debug, Serialize)]
struct FlagLayer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    separator: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
}

impl<'a> From<&'a Args> for FlagLayer<'a> {
    fn from(args: &'a Args) -> Self {
        Self {
            placeholder: args.placeholder.as_deref(),
            separator: args.separator,
            format: args.format,
        }
    }
}

/// Contents of the settings file in effect, if any.
fn config_contents(explicit: Option<&Utf8Path>) -> Result<Option<String>, CliError> {
    let Some(path) = explicit else {
        let fallback = Utf8Path::new(DEFAULT_CONFIG_FILE);
        return if fallback.is_file() {
            read_text(fallback).map(Some)
        } else {
            Ok(None)
        };
    };
    if !path.is_file() {
        return Err(CliError::MissingConfig {
            path: path.to_path_buf(),
        });
    }
    read_text(path).map(Some)
}

fn is_identifier(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|rest| rest == '_' || rest.is_alphanumeric())
}

/// Merges every settings layer for `args`.
///
/// # Errors
///
/// Returns [`CliError::MissingConfig`] when `--config` names a missing file,
/// [`CliError::Settings`] when a layer holds invalid values and
/// [`CliError::InvalidPlaceholder`] when the placeholder is not an identifier.
pub fn load(args: &Args) -> Result<Settings, CliError> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));
    if let Some(contents) = config_contents(args.config.as_deref())? {
        figment = figment.merge(Toml::string(&contents));
    }
    let settings: Settings = figment
        .merge(Env::prefixed(ENV_PREFIX).only(&SETTING_KEYS))
        .merge(Serialized::defaults(FlagLayer::from(args)))
        .extract()?;
    if !is_identifier(&settings.placeholder) {
        return Err(CliError::InvalidPlaceholder(settings.placeholder));
    }
    debug!(
        placeholder = %settings.placeholder,
        separator = %settings.separator,
        format = settings.format.as_str(),
        "resolved settings"
    );
    Ok(settings)
}
