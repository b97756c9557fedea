//! Occurrence store for a single hyperparameter name.

use std::cmp::Reverse;

use tracing::trace;

use crate::{
    HpmanError, HpmanResult, Value,
    occurrence::{Occurrence, Priority},
};

/// Every occurrence recorded under one fully qualified name.
///
/// Occurrences are kept ranked: higher priority first, then those carrying a
/// value, then insertion order. The head is the winning occurrence.
#[derive(Clone, Debug, Default)]
pub struct Node {
    name: String,
    occurrences: Vec<Occurrence>,
    next_index: usize,
}

impl Node {
    /// Creates an empty node for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            occurrences: Vec::new(),
            next_index: 0,
        }
    }

    /// Fully qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fails when `occurrence` would give the name a second parsed default.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::DoubleAssignment`] quoting both locations.
    pub fn check_double_assignment(&self, occurrence: &Occurrence) -> HpmanResult<()> {
        if occurrence.priority() != Priority::Parsed || !occurrence.has_value() {
            return Ok(());
        }
        match self
            .occurrences
            .iter()
            .find(|existing| existing.priority() == Priority::Parsed && existing.has_value())
        {
            Some(first) => Err(HpmanError::DoubleAssignment {
                name: occurrence.name().to_owned(),
                first: first.describe(),
                second: occurrence.describe(),
            }),
            None => Ok(()),
        }
    }

    /// Stores `occurrence` and restores the ranking.
    ///
    /// Parsed occurrences accumulate. Callable and setter occurrences replace
    /// the stored one of the same priority, inheriting its index.
    ///
    /// # Errors
    ///
    /// Returns [`HpmanError::DoubleAssignment`] as described in
    /// [`Node::check_double_assignment`].
    pub fn push(&mut self, mut occurrence: Occurrence) -> HpmanResult<()> {
        self.check_double_assignment(&occurrence)?;
        trace!(
            name = %self.name,
            priority = %occurrence.priority(),
            has_value = occurrence.has_value(),
            "storing occurrence"
        );
        let priority = occurrence.priority();
        let slot = (priority != Priority::Parsed)
            .then(|| {
                self.occurrences
                    .iter_mut()
                    .find(|existing| existing.priority() == priority)
            })
            .flatten();
        if let Some(existing) = slot {
            occurrence.set_index(existing.index());
            *existing = occurrence;
        } else {
            occurrence.set_index(Some(self.next_index));
            self.next_index += 1;
            self.occurrences.push(occurrence);
        }
        self.occurrences.sort_by_key(|occ| {
            (
                Reverse(occ.priority()),
                Reverse(occ.has_value()),
                occ.index(),
            )
        });
        Ok(())
    }

    /// The winning occurrence.
    #[must_use]
    pub fn get(&self) -> Option<&Occurrence> {
        self.occurrences.first()
    }

    /// Value of the winning occurrence.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.get().and_then(Occurrence::value)
    }

    /// Whether the winning occurrence carries no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value().is_none()
    }

    /// Priority of the winning occurrence.
    #[must_use]
    pub fn top_priority(&self) -> Option<Priority> {
        self.get().map(Occurrence::priority)
    }

    /// All occurrences, ranked.
    #[must_use]
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }
}
