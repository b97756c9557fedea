//! Source file discovery for `parse_file`.
//!
//! Directories are walked recursively for `*.py` files. Hidden entries are
//! skipped. Symbolic links to files are followed; links to directories are
//! not, so a walk cannot loop. Every candidate is keyed by its canonical path
//! so a file reachable through several spellings is parsed once.

use std::{collections::BTreeMap, io};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tracing::debug;

use crate::{HpmanError, HpmanResult};

const SOURCE_EXTENSION: &str = "py";

/// Canonicalise `path`, avoiding UNC prefixes on Windows.
fn canonicalise(path: &Utf8Path) -> HpmanResult<Utf8PathBuf> {
    #[cfg(windows)]
    let canonical = dunce::canonicalize(path);
    #[cfg(not(windows))]
    let canonical = std::fs::canonicalize(path);
    canonical
        .and_then(|resolved| Utf8PathBuf::try_from(resolved).map_err(io::Error::other))
        .map_err(|source| HpmanError::io(path, source))
}

fn walk(dir: &Dir, relative: &Utf8Path, found: &mut Vec<Utf8PathBuf>) -> io::Result<()> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name()?;
        if name.starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        let path = relative.join(&name);
        if file_type.is_dir() {
            walk(&dir.open_dir(&name)?, &path, found)?;
        } else if path.extension() == Some(SOURCE_EXTENSION)
            // A link target may lie outside `dir`, so it is checked ambiently.
            && (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
        {
            found.push(path);
        }
    }
    Ok(())
}

fn sources_below(root: &Utf8Path) -> HpmanResult<Vec<Utf8PathBuf>> {
    let mut found = Vec::new();
    Dir::open_ambient_dir(root, ambient_authority())
        .and_then(|dir| walk(&dir, root, &mut found))
        .map_err(|source| HpmanError::io(root, source))?;
    Ok(found)
}

/// A file selected for parsing.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SourceFile {
    /// Spelling the file was first reached by, recorded in occurrences.
    pub(crate) path: Utf8PathBuf,
    /// Symlink-free path the contents are read from.
    pub(crate) canonical: Utf8PathBuf,
}

/// Resolves `paths` into the files to parse, ordered by canonical path.
pub(crate) fn discover<I, P>(paths: I) -> HpmanResult<Vec<SourceFile>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Utf8Path>,
{
    let mut files: BTreeMap<Utf8PathBuf, Utf8PathBuf> = BTreeMap::new();
    for requested in paths {
        let path = requested.as_ref();
        let candidates = if path.is_dir() {
            sources_below(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(HpmanError::file_not_found(path));
        };
        for candidate in candidates {
            let key = canonicalise(&candidate)?;
            files.entry(key).or_insert(candidate);
        }
    }
    debug!(count = files.len(), "discovered source files");
    Ok(files
        .into_iter()
        .map(|(canonical, path)| SourceFile { path, canonical })
        .collect())
}

/// Reads a source file through a capability handle on its parent directory.
pub(crate) fn read_source(path: &Utf8Path) -> HpmanResult<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| HpmanError::io(path, io::Error::other("path has no file name")))?;
    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read_to_string(name))
        .map_err(|source| HpmanError::io(path, source))
}
