//! Source text snippets for diagnostics.
//!
//! [`SourceText`] renders a window of numbered lines around a focus line:
//!
//! ```text
//! train.py:3
//!     1: import torch
//!     2:
//! ==> 3: lr = _('lr', 0.1)
//! ```

use std::fmt::Write as _;

use camino::Utf8Path;

use crate::{HpmanResult, manager::read_source};

/// Lines shown before and after the focus line by [`SourceText::format_location`].
pub const CONTEXT_LINES: usize = 5;

const FOCUS_PROMPT: &str = "==> ";
const PLAIN_PROMPT: &str = "    ";

/// Source code split into lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    /// Splits `source` on `\n`. A trailing newline yields a final empty line.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Reads and splits a file.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::Io`](crate::HpmanError::Io) when the file cannot
    /// be read.
    pub fn from_file(path: &Utf8Path) -> HpmanResult<Self> {
        read_source(path).map(|text| Self::new(&text))
    }

    /// Number of lines; never zero.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Formats lines `from..=to` (1-based), marking `focus`.
    ///
    /// Returns `None` unless `1 <= from <= focus <= to <= line_count()`.
    #[must_use]
    pub fn format_lines(&self, from: usize, to: usize, focus: usize, indent: usize) -> Option<String> {
        if from == 0 || from > focus || focus > to || to > self.lines.len() {
            return None;
        }
        let width = to.to_string().len();
        let pad = " ".repeat(indent);
        let window = self.lines.get(from - 1..to)?;
        let rows: Vec<String> = window
            .iter()
            .zip(from..)
            .map(|(line, number)| {
                let prompt = if number == focus {
                    FOCUS_PROMPT
                } else {
                    PLAIN_PROMPT
                };
                format!("{pad}{prompt}{number:>width$}: {line}")
            })
            .collect();
        Some(rows.join("\n"))
    }

    /// Formats `line` with up to `before` and `after` lines of context.
    ///
    /// Out-of-range line numbers are clamped into the source.
    #[must_use]
    pub fn format_line_with_context(&self, line: usize, before: usize, after: usize) -> String {
        let last = self.lines.len();
        let focus = line.clamp(1, last);
        let from = focus.saturating_sub(before).max(1);
        let to = focus.saturating_add(after).min(last);
        self.format_lines(from, to, focus, 0).unwrap_or_default()
    }

    /// Renders `filename:line` followed by the surrounding source window.
    #[must_use]
    pub fn format_location(&self, filename: &str, line: usize) -> String {
        let mut rendered = String::new();
        // Writing into a `String` cannot fail.
        let _ignored = write!(
            rendered,
            "{filename}:{line}\n{}",
            self.format_line_with_context(line, CONTEXT_LINES, CONTEXT_LINES)
        );
        rendered
    }
}
