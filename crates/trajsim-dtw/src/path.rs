//! Warping path types for DTW alignment.

/// A single step in a warping path, pairing query index `row` with reference
/// index `col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WarpingStep {
    /// Index in the query trajectory.
    pub row: usize,
    /// Index in the reference trajectory.
    pub col: usize,
}

impl WarpingStep {
    /// Create a step.
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// An ordered sequence of warping steps from `(0, 0)` to `(rows-1, cols-1)`.
///
/// Consecutive steps differ by exactly `(+1, 0)`, `(0, +1)` or `(+1, +1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    /// Create a new warping path from a vector of steps.
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the steps as `(row, col)` tuples.
    #[must_use]
    pub fn index_pairs(&self) -> Vec<(usize, usize)> {
        self.0.iter().map(|s| (s.row, s.col)).collect()
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
