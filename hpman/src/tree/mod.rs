//! Dotted-name namespace of hyperparameter nodes.
//!
//! A name such as `optim.lr` lives at the tree path `optim` → `lr`. A tree
//! node may own a [`Node`] and any number of children. Using one name both
//! as a value and as the prefix of other names is an impossible tree unless
//! the value is a shadowed default (relaxed validation only).

use std::collections::BTreeMap;

use tracing::trace;

use crate::{
    HpmanError, HpmanResult, Value,
    node::Node,
    occurrence::{Occurrence, Priority},
    value::Dict,
};

/// Reserved key marking a dict leaf in an annotated tree projection.
pub const DICT_ANNOTATION: &str = "__hpman_dict__";

/// Default separator between name segments.
pub const DEFAULT_SEPARATOR: char = '.';

/// How strictly value/children overlaps are judged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strictness {
    /// No tree node may both hold a value and have children.
    Strict,
    /// A value below setter priority may be shadowed by children.
    Relaxed,
}

/// Recursive namespace keyed by name segments.
#[derive(Clone, Debug)]
pub struct Tree {
    separator: char,
    node: Option<Node>,
    children: BTreeMap<String, Self>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl Tree {
    /// Creates an empty tree splitting names on `separator`.
    #[must_use]
    pub const fn new(separator: char) -> Self {
        Self {
            separator,
            node: None,
            children: BTreeMap::new(),
        }
    }

    /// Segment separator.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Node stored at this position.
    #[must_use]
    pub const fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Child trees keyed by segment.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.children.iter().map(|(key, child)| (key.as_str(), child))
    }

    /// Whether this position has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Walks to `name`, creating missing positions.
    pub fn allocate(&mut self, name: &str) -> &mut Self {
        let separator = self.separator;
        name.split(separator).fold(self, |tree, segment| {
            tree.children
                .entry(segment.to_owned())
                .or_insert_with(|| Self::new(separator))
        })
    }

    /// The subtree at `name`, if every segment exists.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Self> {
        name.split(self.separator)
            .try_fold(self, |tree, segment| tree.children.get(segment))
    }

    /// Whether this position may hold children given its own value.
    #[must_use]
    pub fn allows_children(&self, strictness: Strictness) -> bool {
        match self.node.as_ref().and_then(Node::get) {
            Some(top) if top.has_value() => {
                strictness == Strictness::Relaxed && top.priority() < Priority::Setter
            }
            _ => true,
        }
    }

    /// Whether this position satisfies the overlap rule.
    #[must_use]
    pub fn is_valid(&self, strictness: Strictness) -> bool {
        self.children.is_empty() || self.allows_children(strictness)
    }

    /// Stores an occurrence under its name.
    ///
    /// Parsed occurrences must keep the tree strictly valid; callable and
    /// setter occurrences are judged with relaxed rules. A rejected push
    /// leaves the tree unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::DoubleAssignment`] for a second parsed default
    /// and [`HpmanError::ImpossibleTree`] when the push would make a name
    /// both a value and a prefix.
    pub fn push_occurrence(&mut self, occurrence: Occurrence) -> HpmanResult<()> {
        if let Some(node) = self.get(occurrence.name()).and_then(Self::node) {
            node.check_double_assignment(&occurrence)?;
        }
        let strictness = if occurrence.priority() == Priority::Parsed {
            Strictness::Strict
        } else {
            Strictness::Relaxed
        };
        self.check_push(&occurrence, strictness)?;
        trace!(name = occurrence.name(), "pushing occurrence");
        let name = occurrence.name().to_owned();
        let leaf = self.allocate(&name);
        leaf.node
            .get_or_insert_with(|| Node::new(name.as_str()))
            .push(occurrence)
    }

    /// Assigns `value` to `name` at setter priority.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] when `name` already has
    /// children or an ancestor holds a setter value.
    pub fn set(&mut self, name: &str, value: Value) -> HpmanResult<()> {
        self.push_occurrence(Occurrence::setter(name, value))
    }

    /// Verifies that storing `occurrence` keeps every position on its path
    /// valid under `strictness`, without modifying the tree.
    fn check_push(&self, occurrence: &Occurrence, strictness: Strictness) -> HpmanResult<()> {
        let segments: Vec<&str> = occurrence.name().split(self.separator).collect();
        let mut tree = self;
        let mut path = String::new();
        for (depth, segment) in segments.iter().enumerate() {
            if depth > 0 && !tree.allows_children(strictness) {
                return Err(HpmanError::impossible_tree(
                    path,
                    format!(
                        "it holds a value and cannot also contain `{}`",
                        occurrence.name()
                    ),
                ));
            }
            if !path.is_empty() {
                path.push(self.separator);
            }
            path.push_str(segment);
            match tree.children.get(*segment) {
                Some(child) => tree = child,
                None => return Ok(()),
            }
        }
        if !tree.children.is_empty() && occurrence.has_value() {
            let shadowable =
                strictness == Strictness::Relaxed && occurrence.priority() < Priority::Setter;
            let outranked = tree
                .node
                .as_ref()
                .and_then(Node::top_priority)
                .is_some_and(|top| top > occurrence.priority());
            if !shadowable && !outranked {
                return Err(HpmanError::impossible_tree(
                    path,
                    "it is a prefix of other names and cannot hold a value",
                ));
            }
        }
        Ok(())
    }

    /// Recursively validates every position, naming the first offender.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] for the first invalid position.
    pub fn validate_with(&self, strictness: Strictness) -> HpmanResult<()> {
        self.validate_at("", strictness)
    }

    /// Strict [`Tree::validate_with`].
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] for the first invalid position.
    pub fn validate(&self) -> HpmanResult<()> {
        self.validate_with(Strictness::Strict)
    }

    fn join(&self, prefix: &str, segment: &str) -> String {
        if prefix.is_empty() {
            segment.to_owned()
        } else {
            format!("{prefix}{}{segment}", self.separator)
        }
    }

    fn validate_at(&self, key: &str, strictness: Strictness) -> HpmanResult<()> {
        if !self.is_valid(strictness) {
            return Err(HpmanError::impossible_tree(
                key,
                "a value and nested names share this prefix",
            ));
        }
        self.children
            .iter()
            .try_for_each(|(segment, child)| child.validate_at(&self.join(key, segment), strictness))
    }

    /// Projects the subtree into a nested mapping.
    ///
    /// Branches recurse (their own value is shadowed), leaves contribute their
    /// value, and empty leaves or branches are omitted. With `annotate_dict`,
    /// dict leaves gain [`DICT_ANNOTATION`] so the mapping can be fed back to
    /// a tree setter without being split.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::ImpossibleTree`] when a branch holds a value it
    /// may not shadow.
    pub fn tree_values(&self, annotate_dict: bool) -> HpmanResult<Dict> {
        self.values_at("", annotate_dict)
    }

    fn values_at(&self, key: &str, annotate_dict: bool) -> HpmanResult<Dict> {
        let mut values = Dict::new();
        for (segment, child) in &self.children {
            let child_key = self.join(key, segment);
            if child.children.is_empty() {
                let Some(value) = child.node.as_ref().and_then(Node::value) else {
                    continue;
                };
                values.insert(segment.as_str(), annotated(value, annotate_dict));
            } else {
                if !child.is_valid(Strictness::Relaxed) {
                    return Err(HpmanError::impossible_tree(
                        child_key,
                        "a setter value and nested names share this prefix",
                    ));
                }
                let nested = child.values_at(&child_key, annotate_dict)?;
                if !nested.is_empty() {
                    values.insert(segment.as_str(), nested);
                }
            }
        }
        Ok(values)
    }

    /// `(full name, node)` for every leaf that owns a node, sorted by name.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, &Node)> {
        let mut leaves = Vec::new();
        self.collect_leaves("", &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, key: &str, leaves: &mut Vec<(String, &'a Node)>) {
        for (segment, child) in &self.children {
            let child_key = self.join(key, segment);
            match (&child.node, child.children.is_empty()) {
                (Some(node), true) => leaves.push((child_key, node)),
                _ => child.collect_leaves(&child_key, leaves),
            }
        }
    }

    /// Every node in the subtree, including shadowed ones, in name order.
    #[must_use]
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.node.iter().collect();
        for child in self.children.values() {
            nodes.extend(child.nodes());
        }
        nodes
    }

    /// Number of named hyperparameters in the subtree.
    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes().len()
    }

    /// Whether no position in the subtree holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node.as_ref().is_none_or(Node::is_empty)
            && self.children.values().all(Self::is_empty)
    }
}

fn annotated(value: &Value, annotate_dict: bool) -> Value {
    match value {
        Value::Dict(dict) if annotate_dict => {
            let mut marked = dict.clone();
            marked.insert(DICT_ANNOTATION, true);
            Value::Dict(marked)
        }
        other => other.clone(),
    }
}
