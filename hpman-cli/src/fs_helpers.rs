//! Filesystem helpers shared across `hpman-cli` modules.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::error::CliError;

/// Reads a UTF-8 file through a capability handle on its parent directory.
pub(crate) fn read_text(path: &Utf8Path) -> Result<String, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| io_error(std::io::Error::other("path has no file name")))?;
    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read_to_string(name))
        .map_err(io_error)
}
