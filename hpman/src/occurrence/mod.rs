//! Occurrence records and their priorities.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{Value, source::SourceText};

/// Free-form metadata attached to a call site as keyword arguments.
pub type Hints = BTreeMap<String, Value>;

/// Where a value came from. Later variants override earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Default found by scanning source text.
    Parsed,
    /// Default passed to the callable form at runtime.
    Callable,
    /// Explicit runtime assignment.
    Setter,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parsed => "parsed",
            Self::Callable => "callable",
            Self::Setter => "setter",
        })
    }
}

/// Source location of a parsed occurrence.
#[derive(Clone)]
pub struct Provenance {
    filename: String,
    line: usize,
    source: Arc<SourceText>,
}

impl Provenance {
    /// Records `filename:line` within `source`.
    #[must_use]
    pub fn new(filename: impl Into<String>, line: usize, source: Arc<SourceText>) -> Self {
        Self {
            filename: filename.into(),
            line,
            source,
        }
    }

    /// File the occurrence was parsed from.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 1-based line of the call.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Location header followed by the surrounding source lines.
    #[must_use]
    pub fn describe(&self) -> String {
        self.source.format_location(&self.filename, self.line)
    }
}

impl fmt::Debug for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provenance")
            .field("filename", &self.filename)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// One sighting of a hyperparameter.
#[derive(Clone, Debug)]
pub struct Occurrence {
    name: String,
    value: Option<Value>,
    priority: Priority,
    provenance: Option<Provenance>,
    hints: Hints,
    index: Option<usize>,
}

impl Occurrence {
    /// An occurrence found in source text. `value` is `None` when the call
    /// has no default.
    #[must_use]
    pub fn parsed(
        name: impl Into<String>,
        value: Option<Value>,
        provenance: Provenance,
        hints: Hints,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            priority: Priority::Parsed,
            provenance: Some(provenance),
            hints,
            index: None,
        }
    }

    /// An occurrence registered through the callable form.
    #[must_use]
    pub fn callable(name: impl Into<String>, value: Option<Value>, hints: Hints) -> Self {
        Self {
            name: name.into(),
            value,
            priority: Priority::Callable,
            provenance: None,
            hints,
            index: None,
        }
    }

    /// A runtime assignment.
    #[must_use]
    pub fn setter(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            priority: Priority::Setter,
            provenance: None,
            hints: Hints::new(),
            index: None,
        }
    }

    /// Fully qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recorded value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether a value was recorded.
    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Priority class.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Source location for parsed occurrences.
    #[must_use]
    pub const fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// Keyword hints.
    #[must_use]
    pub const fn hints(&self) -> &Hints {
        &self.hints
    }

    /// Insertion order within its node, once stored.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    pub(crate) const fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    /// Formatted location for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.provenance.as_ref().map_or_else(
            || format!("<{} occurrence of `{}`>", self.priority, self.name),
            Provenance::describe,
        )
    }
}
