//! Primary error enum for parsing and lookup flows.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type HpmanResult<T> = Result<T, HpmanError>;

/// Errors raised while extracting, storing or querying hyperparameters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HpmanError {
    /// The source could not be scanned for call sites.
    #[error("{filename}:{line}: invalid syntax: {message}")]
    Syntax {
        /// Name of the offending source.
        filename: String,
        /// 1-based line where scanning failed.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A placeholder call received the wrong number of positional arguments.
    #[error(
        "{filename}:{line}: placeholder calls take a name and an optional default, \
         got {count} positional argument(s)"
    )]
    Arity {
        /// Name of the offending source.
        filename: String,
        /// 1-based line of the call.
        line: usize,
        /// Number of positional arguments received.
        count: usize,
    },

    /// The name argument of a placeholder call is not a string literal.
    #[error("{filename}:{line}: the hyperparameter name must be a string literal")]
    NotLiteralName {
        /// Name of the offending source.
        filename: String,
        /// 1-based line of the call.
        line: usize,
    },

    /// A keyword hint could not be literal-evaluated.
    #[error("hint `{hint}` is not literal-evaluable:\n{context}")]
    NotLiteralEvaluable {
        /// Keyword name of the hint (`**` for unpacked keywords).
        hint: String,
        /// Formatted source location of the call.
        context: String,
    },

    /// Two parsed occurrences of one name both carry a default value.
    #[error("Duplicated default values:\nFirst occurrence:\n{first}\nSecond occurrence:\n{second}\n")]
    DoubleAssignment {
        /// Hyperparameter name.
        name: String,
        /// Formatted location of the occurrence already stored.
        first: String,
        /// Formatted location of the rejected occurrence.
        second: String,
    },

    /// A name is used both as a value and as the prefix of other names.
    #[error("impossible tree at `{key}`: {reason}")]
    ImpossibleTree {
        /// Dotted key where the conflict was detected.
        key: String,
        /// Explanation of the conflict.
        reason: String,
    },

    /// A path given to `parse_file` is neither a file nor a directory.
    #[error("`{path}` is not a file or directory")]
    FileNotFound {
        /// Path as supplied by the caller.
        path: Utf8PathBuf,
    },

    /// Reading a source file or directory failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Lookup of a name with no concrete value.
    #[error("`{name}` not found")]
    NotFound {
        /// Requested hyperparameter name.
        name: String,
    },
}
