//! Configuration builder for the stepwise pruning search.

use crate::bounds::SignWeighting;
use crate::candidate::CandidateSet;
use crate::error::HaarError;
use crate::result::SearchResult;
use crate::series::HaarSeries;

/// Configuration for a k-nearest-candidate pruning search.
///
/// Construct via [`SearchConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter     | Default                        |
/// |---------------|--------------------------------|
/// | `start_depth` | level count of the query       |
/// | `weighting`   | [`SignWeighting::Dyadic`]      |
/// | `max_rounds`  | the start depth                |
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub(crate) k: usize,
    pub(crate) start_depth: Option<u32>,
    pub(crate) weighting: SignWeighting,
    pub(crate) max_rounds: Option<usize>,
}

impl SearchConfig {
    /// Create a search configuration keeping `k` candidates.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::InvalidK`] | `k` is zero |
    pub fn new(k: usize) -> Result<Self, HaarError> {
        if k == 0 {
            return Err(HaarError::InvalidK { k });
        }
        Ok(Self {
            k,
            start_depth: None,
            weighting: SignWeighting::default(),
            max_rounds: None,
        })
    }

    /// Set the depth the search starts at. Must lie in `1..=levels` of the
    /// query; checked when the search runs.
    #[must_use]
    pub fn with_start_depth(mut self, depth: u32) -> Self {
        self.start_depth = Some(depth);
        self
    }

    /// Set the sign-sum weighting used by the bound estimator.
    #[must_use]
    pub fn with_weighting(mut self, weighting: SignWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Cap the number of pruning rounds. The loop stops with a warning when
    /// the cap is reached before k candidates remain.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Return the number of candidates to keep.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return the explicit start depth, if one was set.
    #[must_use]
    pub fn start_depth(&self) -> Option<u32> {
        self.start_depth
    }

    /// Return the sign-sum weighting.
    #[must_use]
    pub fn weighting(&self) -> SignWeighting {
        self.weighting
    }

    /// Return the explicit round cap, if one was set.
    #[must_use]
    pub fn max_rounds(&self) -> Option<usize> {
        self.max_rounds
    }

    /// Prune `candidates` against `query` until at most k remain or depth 1
    /// has been evaluated. Dead entries are removed from `candidates` on
    /// return.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::InvalidDepth`] | Start depth is outside `1..=query.levels()` |
    /// | [`HaarError::LengthMismatch`] | Candidates differ in length from the query |
    /// | [`HaarError::WeightOverflow`] | Doubly-exponential weights overflow at the start depth |
    pub fn search(
        &self,
        query: &HaarSeries,
        candidates: &mut CandidateSet,
    ) -> Result<SearchResult, HaarError> {
        crate::search::run(self, query, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SearchConfig::new(3).unwrap();
        assert_eq!(config.k(), 3);
        assert_eq!(config.start_depth(), None);
        assert_eq!(config.weighting(), SignWeighting::Dyadic);
        assert_eq!(config.max_rounds(), None);
    }

    #[test]
    fn builder_overrides() {
        let config = SearchConfig::new(1)
            .unwrap()
            .with_start_depth(2)
            .with_weighting(SignWeighting::DoublyExponential)
            .with_max_rounds(5);
        assert_eq!(config.start_depth(), Some(2));
        assert_eq!(config.weighting(), SignWeighting::DoublyExponential);
        assert_eq!(config.max_rounds(), Some(5));
    }

    #[test]
    fn error_zero_k() {
        assert!(matches!(SearchConfig::new(0), Err(HaarError::InvalidK { k: 0 })));
    }
}
