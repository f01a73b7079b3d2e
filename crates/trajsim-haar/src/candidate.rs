//! Candidate collection with per-entry liveness flags.

use crate::error::HaarError;
use crate::series::HaarSeries;

#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) position: usize,
    pub(crate) series: HaarSeries,
    pub(crate) alive: bool,
}

/// Haar decompositions keyed by their position in the original collection.
///
/// Iteration follows insertion order. The pruning search only flips
/// liveness flags while it runs and calls [`CandidateSet::compact`] once it
/// concludes, so positions never shift mid-pass.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    entries: Vec<Candidate>,
    next_position: usize,
}

impl CandidateSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from decompositions, assigning positions `0, 1, 2, ...`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::LengthMismatch`] | A decomposition differs in length from the first |
    pub fn from_series(series: impl IntoIterator<Item = HaarSeries>) -> Result<Self, HaarError> {
        let mut set = Self::new();
        for s in series {
            set.push(s)?;
        }
        Ok(set)
    }

    /// Append a decomposition and return its assigned position.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::LengthMismatch`] | `series` differs in length from existing entries |
    pub fn push(&mut self, series: HaarSeries) -> Result<usize, HaarError> {
        if let Some(first) = self.entries.first() {
            first.series.check_same_len(&series)?;
        }
        let position = self.next_position;
        self.entries.push(Candidate {
            position,
            series,
            alive: true,
        });
        self.next_position += 1;
        Ok(position)
    }

    /// Return the number of entries, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the set holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the number of entries still alive.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.entries.iter().filter(|c| c.alive).count()
    }

    /// Return whether the entry at original `position` is alive, or `None`
    /// if no such entry exists.
    #[must_use]
    pub fn is_alive(&self, position: usize) -> Option<bool> {
        self.entries
            .iter()
            .find(|c| c.position == position)
            .map(|c| c.alive)
    }

    /// Return the decomposition at original `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&HaarSeries> {
        self.entries
            .iter()
            .find(|c| c.position == position)
            .map(|c| &c.series)
    }

    /// Iterate `(position, series)` over alive entries in insertion order.
    pub fn alive(&self) -> impl Iterator<Item = (usize, &HaarSeries)> {
        self.entries
            .iter()
            .filter(|c| c.alive)
            .map(|c| (c.position, &c.series))
    }

    /// Drop dead entries, keeping the relative order of the rest.
    pub fn compact(&mut self) {
        self.entries.retain(|c| c.alive);
    }

    pub(crate) fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub(crate) fn mark_dead(&mut self, index: usize) {
        self.entries[index].alive = false;
    }
}
