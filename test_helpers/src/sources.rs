//! Temporary directory trees of script files.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tempfile::TempDir;

/// A temporary directory that is removed on drop.
pub struct SourceTree {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl SourceTree {
    /// Creates an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is not
    /// UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temp dir is not valid UTF-8: {}", path.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Creates a tree holding `files`, given as `(relative path, contents)`.
    ///
    /// # Errors
    ///
    /// As for [`SourceTree::new`] and [`SourceTree::write`].
    pub fn with_files(files: &[(&str, &str)]) -> Result<Self> {
        let tree = Self::new()?;
        for (relative, contents) in files {
            tree.write(relative, contents)?;
        }
        Ok(tree)
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `relative` inside the tree.
    #[must_use]
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Writes `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        let dir = Dir::open_ambient_dir(&self.root, ambient_authority())
            .with_context(|| format!("open {}", self.root))?;
        if let Some(parent) = Utf8Path::new(relative)
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
        {
            dir.create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        dir.write(relative, contents)
            .with_context(|| format!("write {relative}"))?;
        Ok(self.path(relative))
    }
}
