//! Convenience constructors for `HpmanError`.

use camino::{Utf8Path, Utf8PathBuf};

use super::HpmanError;

impl HpmanError {
    /// Builds a [`HpmanError::Syntax`] error.
    #[must_use]
    pub fn syntax(filename: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            filename: filename.to_owned(),
            line,
            message: message.into(),
        }
    }

    /// Builds a [`HpmanError::ImpossibleTree`] error.
    #[must_use]
    pub fn impossible_tree(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImpossibleTree {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`HpmanError::NotFound`] error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Builds a [`HpmanError::Io`] error for `path`.
    #[must_use]
    pub fn io(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Builds a [`HpmanError::FileNotFound`] error.
    #[must_use]
    pub fn file_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Whether the error reports a missing hyperparameter.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
