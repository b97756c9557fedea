//! The hyperparameter manager.
//!
//! A [`Manager`] is used in two phases. At parse time it scans sources for
//! placeholder calls and records their defaults. At runtime it answers
//! lookups and accepts overrides, which always win over parsed defaults.
//!
//! ```
//! use hpman::{Manager, Value};
//!
//! let mut hpm = Manager::new("_");
//! hpm.parse_source("lr = _('optim.lr', 0.1)\nsteps = _('steps', 100)", "train.py")?;
//! hpm.set_value("steps", 200)?;
//! assert_eq!(hpm.get_value("optim.lr")?, Value::Float(0.1));
//! assert_eq!(hpm.get_value("steps")?, Value::Int(200));
//! # Ok::<(), hpman::HpmanError>(())
//! ```

mod discovery;

use std::collections::BTreeMap;

use camino::Utf8Path;
use tracing::debug;

pub(crate) use discovery::read_source;

use crate::{
    HpmanError, HpmanResult, Value,
    extract::Extractor,
    node::Node,
    occurrence::{Hints, Occurrence},
    tree::{DEFAULT_SEPARATOR, DICT_ANNOTATION, Tree},
    value::Dict,
};

/// Filename recorded for sources parsed without one.
pub const UNKNOWN_FILENAME: &str = "<unknown>";

/// Parses placeholder calls and resolves hyperparameter values.
#[derive(Clone, Debug)]
pub struct Manager {
    extractor: Extractor,
    tree: Tree,
}

impl Manager {
    /// Creates a manager for calls of `placeholder`, nesting names on `.`.
    #[must_use]
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self::with_separator(placeholder, DEFAULT_SEPARATOR)
    }

    /// Creates a manager nesting names on `separator`.
    #[must_use]
    pub fn with_separator(placeholder: impl Into<String>, separator: char) -> Self {
        Self {
            extractor: Extractor::new(placeholder),
            tree: Tree::new(separator),
        }
    }

    /// Identifier marking call sites.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        self.extractor.placeholder()
    }

    /// Separator between name segments.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.tree.separator()
    }

    /// The underlying namespace.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Records every placeholder call in `source`, then validates the tree
    /// strictly.
    ///
    /// Calls are recorded in source order, a nested call right after the
    /// call enclosing it. When one name has several parsed defaults, the
    /// earliest in that order is reported as the first occurrence of the
    /// double assignment. Python's breadth-first `ast.walk` can pick a
    /// different one when one of the calls is nested.
    ///
    /// # Errors
    ///
    /// Propagates extraction errors, [`HpmanError::DoubleAssignment`] and
    /// [`HpmanError::ImpossibleTree`].
    pub fn parse_source(&mut self, source: &str, filename: &str) -> HpmanResult<&mut Self> {
        let occurrences = self.extractor.extract(source, filename)?;
        debug!(filename, count = occurrences.len(), "parsed source");
        for occurrence in occurrences {
            self.tree.push_occurrence(occurrence)?;
        }
        self.tree.validate()?;
        Ok(self)
    }

    /// Parses a file, or every `*.py` file below a directory. Symlinked
    /// files below a directory are followed; symlinked directories are not.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::FileNotFound`] for a missing path,
    /// [`HpmanError::Io`] when reading fails, and any parse error.
    pub fn parse_file(&mut self, path: impl AsRef<Utf8Path>) -> HpmanResult<&mut Self> {
        self.parse_files([path])
    }

    /// Parses several files and directories, each file exactly once, in
    /// canonical path order.
    ///
    /// # Errors
    ///
    /// As for [`Manager::parse_file`]. Missing paths are reported before any
    /// file is parsed.
    pub fn parse_files<I, P>(&mut self, paths: I) -> HpmanResult<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        for file in discovery::discover(paths)? {
            let source = read_source(&file.canonical)?;
            self.parse_source(&source, file.path.as_str())?;
        }
        Ok(self)
    }

    /// Resolves `name`: a leaf yields its value, a prefix yields the nested
    /// mapping below it.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::NotFound`] when nothing is known under `name`.
    pub fn get_value(&self, name: &str) -> HpmanResult<Value> {
        self.try_value(name)?
            .ok_or_else(|| HpmanError::not_found(name))
    }

    /// Non-raising form of [`Manager::get_value`].
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] when a prefix holds a setter
    /// value it cannot shadow.
    pub fn try_value(&self, name: &str) -> HpmanResult<Option<Value>> {
        let Some(tree) = self.tree.get(name).filter(|tree| !tree.is_empty()) else {
            return Ok(None);
        };
        if tree.is_leaf() {
            return Ok(tree.node().and_then(Node::value).cloned());
        }
        tree.tree_values(false).map(|values| Some(Value::Dict(values)))
    }

    /// Whether `name` resolves to a value.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        matches!(self.try_value(name), Ok(Some(_)))
    }

    /// Winning occurrence of a leaf name.
    #[must_use]
    pub fn get_occurrence(&self, name: &str) -> Option<&Occurrence> {
        self.tree
            .get(name)
            .filter(|tree| tree.is_leaf() && !tree.is_empty())
            .and_then(Tree::node)
            .and_then(Node::get)
    }

    /// Every occurrence recorded for `name`, ranked.
    #[must_use]
    pub fn occurrences(&self, name: &str) -> &[Occurrence] {
        self.tree
            .get(name)
            .and_then(Tree::node)
            .map(Node::occurrences)
            .unwrap_or_default()
    }

    /// Flat `{name: value}` for every leaf holding a value.
    #[must_use]
    pub fn get_values(&self) -> BTreeMap<String, Value> {
        self.tree
            .flatten()
            .into_iter()
            .filter_map(|(name, node)| node.value().map(|value| (name, value.clone())))
            .collect()
    }

    /// Nested mapping below `prefix` (`""` for the whole tree).
    ///
    /// A missing prefix or a leaf yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] when a branch holds a setter
    /// value it cannot shadow.
    pub fn get_tree(&self, prefix: &str, annotate_dict: bool) -> HpmanResult<Dict> {
        let subtree = if prefix.is_empty() {
            Some(&self.tree)
        } else {
            self.tree.get(prefix)
        };
        subtree.map_or_else(|| Ok(Dict::new()), |tree| tree.tree_values(annotate_dict))
    }

    /// Overrides `name` with the highest priority.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] when `name` already prefixes
    /// other names, or an ancestor holds a setter value.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> HpmanResult<&mut Self> {
        self.tree.set(name, value.into())?;
        Ok(self)
    }

    /// Applies [`Manager::set_value`] for each entry, in iteration order.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected assignment.
    pub fn set_values<I, K, V>(&mut self, values: I) -> HpmanResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in values {
            self.tree.set(name.as_ref(), value.into())?;
        }
        Ok(self)
    }

    /// Applies a nested mapping below `prefix` as setter overrides.
    ///
    /// Nested mappings are split into dotted names unless they carry a true
    /// [`DICT_ANNOTATION`], in which case the marker is removed and the
    /// mapping is stored as one value.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] for non-string keys or rejected
    /// assignments.
    pub fn set_tree(&mut self, values: &Dict, prefix: &str) -> HpmanResult<&mut Self> {
        let mut flat = Vec::new();
        self.flatten_mapping(values, prefix, &mut flat)?;
        self.set_values(flat)
    }

    fn flatten_mapping(
        &self,
        values: &Dict,
        prefix: &str,
        flat: &mut Vec<(String, Value)>,
    ) -> HpmanResult<()> {
        for (key, value) in values.iter() {
            let Some(segment) = key.as_str() else {
                return Err(HpmanError::impossible_tree(
                    prefix,
                    format!("tree keys must be strings, found {key}"),
                ));
            };
            let name = if prefix.is_empty() {
                segment.to_owned()
            } else {
                format!("{prefix}{}{segment}", self.separator())
            };
            match value {
                Value::Dict(nested) => {
                    let mut nested = nested.clone();
                    let opaque = nested
                        .remove_str(DICT_ANNOTATION)
                        .is_some_and(|marker| marker.is_truthy());
                    if opaque {
                        flat.push((name, Value::Dict(nested)));
                    } else {
                        self.flatten_mapping(&nested, &name, flat)?;
                    }
                }
                other => flat.push((name, other.clone())),
            }
        }
        Ok(())
    }

    /// The callable form: records `default` at callable priority, then
    /// resolves `name`.
    ///
    /// # Errors
    ///
    /// As for [`Manager::call_with_hints`].
    pub fn call(&mut self, name: &str, default: impl Into<Value>) -> HpmanResult<Value> {
        self.call_with_hints(name, Some(default.into()), Hints::new())
    }

    /// The callable form with optional default and hints. Without a default
    /// nothing is recorded and the call is a plain lookup.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] when the default cannot be
    /// stored and [`HpmanError::NotFound`] when `name` has no value.
    pub fn call_with_hints(
        &mut self,
        name: &str,
        default: Option<Value>,
        hints: Hints,
    ) -> HpmanResult<Value> {
        if let Some(value) = default {
            self.tree
                .push_occurrence(Occurrence::callable(name, Some(value), hints))?;
        }
        self.get_value(name)
    }

    /// Number of named hyperparameters, including empty and shadowed ones.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tree.count()
    }
}

#[cfg(test)]
mod tests;
