//! Library interface for the `hpman-cli` binary.
//!
//! The binary scans Python sources for hyperparameter placeholders, applies
//! overrides and prints the result. Settings are layered with `figment`; see
//! [`settings`].

pub mod cli;
pub mod error;
mod fs_helpers;
pub mod logging;
pub mod overrides;
pub mod render;
pub mod settings;

use std::io::Write;

use camino::Utf8PathBuf;
use hpman::Manager;
use tracing::info;

use crate::{cli::Args, error::CliError};

/// Runs the pipeline for `args` and writes the rendering to `out`.
///
/// # Errors
///
/// Returns any settings, parsing, override or rendering failure, and
/// [`CliError::Io`] when writing fails.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    let settings = settings::load(args)?;
    let mut manager = Manager::with_separator(settings.placeholder.as_str(), settings.separator);
    manager.parse_files(&args.paths)?;
    info!(count = manager.count(), "parsed hyperparameters");
    overrides::apply(&mut manager, &args.override_files, &args.assignments)?;
    let rendered = render::render(&manager, settings.format, args.should_annotate_dicts)?;
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|source| CliError::Io {
            path: Utf8PathBuf::from("<stdout>"),
            source,
        })
}
