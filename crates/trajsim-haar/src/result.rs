//! Result types for the stepwise pruning search.

use crate::bounds::Bounds;

/// A candidate that survived pruning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Survivor {
    /// Position in the original candidate collection.
    pub position: usize,
    /// Bounds at the final evaluated depth.
    pub bounds: Bounds,
}

/// Bookkeeping for one pruning round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    /// Depth the bounds were evaluated at.
    pub depth: u32,
    /// k-th smallest upper bound among the alive candidates.
    pub threshold: f64,
    /// Alive candidates entering the round.
    pub alive_before: usize,
    /// Candidates discarded in the round.
    pub pruned: usize,
}

/// Outcome of a stepwise pruning search.
///
/// `survivors` is a set, not a ranking: it keeps insertion order and every
/// true top-k member, but callers wanting exact order must compute full
/// distances for it.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Surviving candidates in insertion order.
    pub survivors: Vec<Survivor>,
    /// One entry per executed round.
    pub rounds: Vec<RoundSummary>,
    /// Depth of the last evaluated round, or the start depth if none ran.
    pub final_depth: u32,
}

impl SearchResult {
    /// Return the surviving positions in insertion order.
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        self.survivors.iter().map(|s| s.position).collect()
    }

    /// Return the total number of candidates discarded.
    #[must_use]
    pub fn pruned(&self) -> usize {
        self.rounds.iter().map(|r| r.pruned).sum()
    }
}
