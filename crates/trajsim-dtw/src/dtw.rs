//! Banded DTW alignment of two trajectories.

use tracing::{debug, instrument};

use crate::constraint::{Bandwidth, ConstraintRegion};
use crate::error::DtwError;
use crate::matrix::CostMatrix;
use crate::path::{WarpingPath, WarpingStep};
use crate::point::Trajectory;

/// Immutable DTW configuration. Copyable.
///
/// # Defaults
///
/// | Parameter  | Default |
/// |------------|---------|
/// | `decimals` | 4       |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dtw {
    bandwidth: Bandwidth,
    decimals: usize,
}

/// Everything produced by one alignment.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Band used to mask the cost matrix.
    pub region: ConstraintRegion,
    /// Pointwise distances, unreachable outside the band.
    pub matrix: CostMatrix,
    /// Optimal correspondence from `(0, 0)` to the terminal cell.
    pub path: WarpingPath,
    /// Sum of the matrix cells visited by `path`, in kilometres.
    pub cost: f64,
}

impl Dtw {
    /// Create a DTW calculator with the given Sakoe-Chiba bandwidth.
    #[must_use]
    pub fn new(bandwidth: Bandwidth) -> Self {
        Self {
            bandwidth,
            decimals: 4,
        }
    }

    /// Set the number of decimals cost matrix cells are rounded to.
    #[must_use]
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Return the configured bandwidth.
    #[must_use]
    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    /// Return the configured rounding precision.
    #[must_use]
    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Build the constraint region for a `query_len` x `ref_len` alignment.
    ///
    /// # Errors
    ///
    /// See [`ConstraintRegion::build`].
    pub fn region(&self, query_len: usize, ref_len: usize) -> Result<ConstraintRegion, DtwError> {
        ConstraintRegion::build(query_len, ref_len, self.bandwidth)
    }

    /// Build the banded cost matrix for `query` against `reference`.
    ///
    /// # Errors
    ///
    /// See [`CostMatrix::build`].
    pub fn cost_matrix(
        &self,
        query: &Trajectory,
        reference: &Trajectory,
        region: &ConstraintRegion,
    ) -> Result<CostMatrix, DtwError> {
        CostMatrix::build(query, reference, region, self.decimals)
    }

    /// Align `query` against `reference`: band, connectivity check, cost
    /// matrix, then backtrace.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidBandwidth`] | Fractional bandwidth is negative or non-finite |
    /// | [`DtwError::UnreachableTerminal`] | Band excludes the terminal cell |
    /// | [`DtwError::DisconnectedRegion`] | Band has a gap between two rows |
    /// | [`DtwError::BlockedPath`] | Backtrace cannot continue through reachable cells |
    #[instrument(skip_all, fields(query = %query.id(), reference = %reference.id()))]
    pub fn align(&self, query: &Trajectory, reference: &Trajectory) -> Result<Alignment, DtwError> {
        let region = self.region(query.len(), reference.len())?;
        region.check_connected()?;

        let matrix = self.cost_matrix(query, reference, &region)?;
        let path = backtrace(&matrix)?;

        let cost = path
            .steps()
            .iter()
            .filter_map(|s| matrix.get(s.row, s.col))
            .sum();

        debug!(path_len = path.len(), cost, "alignment complete");
        Ok(Alignment {
            region,
            matrix,
            path,
            cost,
        })
    }
}

/// Trace the lowest-cost path back from the terminal cell to `(0, 0)`.
///
/// At each cell the cheapest of the diagonal, upper and left neighbours is
/// taken; on the first row or column only the single in-bounds neighbour is
/// considered. Ties resolve diagonal first, then up, then left. Unreachable
/// cells compare as infinitely expensive and may never be entered.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptyTrajectory`] | Matrix has no rows or no columns |
/// | [`DtwError::UnreachableTerminal`] | Terminal cell is unreachable |
/// | [`DtwError::BlockedPath`] | The chosen neighbour is unreachable |
#[instrument(skip_all, fields(rows = matrix.rows(), cols = matrix.cols()))]
pub fn backtrace(matrix: &CostMatrix) -> Result<WarpingPath, DtwError> {
    if matrix.rows() == 0 || matrix.cols() == 0 {
        return Err(DtwError::EmptyTrajectory);
    }

    let mut row = matrix.rows() - 1;
    let mut col = matrix.cols() - 1;
    if !matrix.is_reachable(row, col) {
        return Err(DtwError::UnreachableTerminal { row, col });
    }

    let cost = |r: usize, c: usize| matrix.get(r, c).unwrap_or(f64::INFINITY);

    let mut steps = Vec::with_capacity(matrix.rows() + matrix.cols() - 1);
    steps.push(WarpingStep::new(row, col));

    while row > 0 || col > 0 {
        let (next_row, next_col) = if row == 0 {
            (0, col - 1)
        } else if col == 0 {
            (row - 1, 0)
        } else {
            let diag = cost(row - 1, col - 1);
            let up = cost(row - 1, col);
            let left = cost(row, col - 1);
            if diag <= up && diag <= left {
                (row - 1, col - 1)
            } else if up <= left {
                (row - 1, col)
            } else {
                (row, col - 1)
            }
        };

        if !matrix.is_reachable(next_row, next_col) {
            return Err(DtwError::BlockedPath { row, col });
        }
        row = next_row;
        col = next_col;
        steps.push(WarpingStep::new(row, col));
    }

    steps.reverse();
    Ok(WarpingPath::new(steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Point, TrajectoryId};
    use chrono::NaiveDate;

    fn trajectory(id: i64, coords: &[(f64, f64)]) -> Trajectory {
        let t0 = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let points = coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| {
                Point::new(
                    t0 + chrono::Duration::seconds(10 * i as i64),
                    lat,
                    lon,
                    TrajectoryId::new(id),
                )
            })
            .collect();
        Trajectory::new(points).unwrap()
    }

    fn full(rows: usize, cols: usize, values: &[f64]) -> CostMatrix {
        CostMatrix::from_cells(rows, cols, values.iter().map(|&v| Some(v)).collect())
    }

    #[test]
    fn tie_prefers_diagonal() {
        // All neighbours of (1,1) cost the same.
        let m = full(2, 2, &[1.0, 1.0, 1.0, 0.0]);
        let path = backtrace(&m).unwrap();
        assert_eq!(path.index_pairs(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn tie_prefers_up_over_left() {
        // From (1,2): diag (0,1)=5, up (0,2)=1, left (1,1)=1 -> up.
        let m = full(2, 3, &[0.0, 5.0, 1.0, 9.0, 1.0, 0.0]);
        let path = backtrace(&m).unwrap();
        assert_eq!(path.index_pairs(), vec![(0, 0), (0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn picks_left_when_cheapest() {
        // From (1,2): diag (0,1)=5, up (0,2)=4, left (1,1)=1 -> left, then from (1,1) diag.
        let m = full(2, 3, &[0.0, 5.0, 4.0, 9.0, 1.0, 0.0]);
        let path = backtrace(&m).unwrap();
        assert_eq!(path.index_pairs(), vec![(0, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn first_column_only_moves_up() {
        let m = full(3, 1, &[0.0, 1.0, 2.0]);
        let path = backtrace(&m).unwrap();
        assert_eq!(path.index_pairs(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn first_row_only_moves_left() {
        let m = full(1, 3, &[0.0, 1.0, 2.0]);
        let path = backtrace(&m).unwrap();
        assert_eq!(path.index_pairs(), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn single_cell() {
        let m = full(1, 1, &[3.0]);
        assert_eq!(backtrace(&m).unwrap().index_pairs(), vec![(0, 0)]);
    }

    #[test]
    fn unreachable_terminal_fails_fast() {
        let m = CostMatrix::from_cells(2, 2, vec![Some(0.0), Some(1.0), Some(1.0), None]);
        assert!(matches!(
            backtrace(&m),
            Err(DtwError::UnreachableTerminal { row: 1, col: 1 })
        ));
    }

    #[test]
    fn blocked_path_is_reported() {
        let m = CostMatrix::from_cells(2, 2, vec![None, None, None, Some(0.0)]);
        assert!(matches!(backtrace(&m), Err(DtwError::BlockedPath { row: 1, col: 1 })));
    }

    #[test]
    fn identical_trajectories_follow_diagonal() {
        let coords = [(55.0, 12.0), (55.01, 12.01), (55.02, 12.02), (55.03, 12.03)];
        let q = trajectory(1, &coords);
        let r = trajectory(2, &coords);
        let alignment = Dtw::new(Bandwidth::Absolute(1)).align(&q, &r).unwrap();
        for step in alignment.path.steps() {
            assert_eq!(step.row, step.col);
        }
        assert_eq!(alignment.cost, 0.0);
    }

    #[test]
    fn align_square_band_two() {
        let q: Vec<(f64, f64)> = (0..8).map(|i| (55.0 + 0.001 * i as f64, 12.0)).collect();
        let r: Vec<(f64, f64)> = (0..8).map(|i| (55.0005 + 0.001 * i as f64, 12.0)).collect();
        let alignment = Dtw::new(Bandwidth::Absolute(2))
            .align(&trajectory(1, &q), &trajectory(2, &r))
            .unwrap();

        let steps = alignment.path.steps();
        assert_eq!(steps.first(), Some(&WarpingStep::new(0, 0)));
        assert_eq!(steps.last(), Some(&WarpingStep::new(7, 7)));
        assert!(alignment.cost > 0.0);
    }

    #[test]
    fn align_rejects_band_without_terminal() {
        let coords = [(1.0, 1.0), (1.1, 1.1), (1.2, 1.2)];
        let result = Dtw::new(Bandwidth::Absolute(0)).align(&trajectory(1, &coords), &trajectory(2, &coords));
        let err = result.unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, DtwError::UnreachableTerminal { row: 2, col: 2 }));
    }

    #[test]
    fn default_decimals() {
        let dtw = Dtw::new(Bandwidth::Fraction(0.3));
        assert_eq!(dtw.decimals(), 4);
        assert_eq!(dtw.with_decimals(2).decimals(), 2);
    }
}
