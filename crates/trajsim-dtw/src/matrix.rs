//! Dense banded cost matrix for DTW alignment.

use std::fmt;

use tracing::{debug, instrument};

use crate::constraint::ConstraintRegion;
use crate::distance::{haversine_km, round_half_up};
use crate::error::DtwError;
use crate::point::Trajectory;

/// Dense `rows x cols` matrix of pointwise distances in kilometres.
///
/// Cells outside the constraint region are `None` (unreachable).
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl CostMatrix {
    /// Fill the matrix for `query` (rows) against `reference` (columns).
    ///
    /// Every cell inside `region` holds the haversine distance rounded half-up
    /// to `decimals` places; every other cell is unreachable.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::RegionShapeMismatch`] | `region` was built for another query or reference length |
    #[instrument(skip_all, fields(rows = query.len(), cols = reference.len()))]
    pub fn build(
        query: &Trajectory,
        reference: &Trajectory,
        region: &ConstraintRegion,
        decimals: usize,
    ) -> Result<Self, DtwError> {
        let rows = query.len();
        let cols = reference.len();
        if region.len() != rows || region.ref_len() != cols {
            return Err(DtwError::RegionShapeMismatch {
                region_rows: region.len(),
                query_len: rows,
            });
        }

        let mut cells = vec![None; rows * cols];
        let mut filled = 0usize;
        for (row, q) in query.points().iter().enumerate() {
            for col in region.column_range(row) {
                let d = haversine_km(q, &reference[col]);
                cells[row * cols + col] = Some(round_half_up(d, decimals));
                filled += 1;
            }
        }

        debug!(filled, total = rows * cols, "cost matrix filled");
        Ok(Self { rows, cols, cells })
    }

    /// Build a matrix from raw cells in row-major order.
    #[cfg(test)]
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    /// Return the number of rows (query length).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns (reference length).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the cost at `(row, col)`, or `None` if the cell is unreachable.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `col >= cols`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        assert!(row < self.rows, "row {row} out of bounds for {} rows", self.rows);
        assert!(col < self.cols, "column {col} out of bounds for {} columns", self.cols);
        self.cells[row * self.cols + col]
    }

    /// Return true if `(row, col)` holds a finite cost.
    #[must_use]
    pub fn is_reachable(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    /// Return one row of cells.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Return the number of reachable cells.
    #[must_use]
    pub fn reachable_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl fmt::Display for CostMatrix {
    /// Render one bracketed line per row with four decimals; unreachable cells print as `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let rendered: Vec<String> = self
                .row(row)
                .iter()
                .map(|c| match c {
                    Some(v) => format!("{v:.4}"),
                    None => "-".to_string(),
                })
                .collect();
            writeln!(f, "[{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Bandwidth;
    use crate::point::{Point, TrajectoryId};
    use chrono::NaiveDate;

    fn line(id: i64, lats: &[f64]) -> Trajectory {
        let t0 = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let points = lats
            .iter()
            .enumerate()
            .map(|(i, &lat)| {
                Point::new(
                    t0 + chrono::Duration::seconds(i as i64),
                    lat,
                    0.0,
                    TrajectoryId::new(id),
                )
            })
            .collect();
        Trajectory::new(points).unwrap()
    }

    #[test]
    fn cells_outside_band_are_unreachable() {
        let q = line(1, &[0.0, 0.01, 0.02, 0.03]);
        let r = line(2, &[0.0, 0.01, 0.02, 0.03]);
        let region = ConstraintRegion::build(4, 4, Bandwidth::Absolute(0)).unwrap();
        let m = CostMatrix::build(&q, &r, &region, 4).unwrap();

        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(m.is_reachable(row, col), region.contains(row, col));
            }
        }
        assert_eq!(m.get(0, 0), Some(0.0));
    }

    #[test]
    fn cells_rounded_to_four_places() {
        // 0.01 degrees of latitude ~ 1.1119 km
        let q = line(1, &[0.0]);
        let r = line(2, &[0.01]);
        let region = ConstraintRegion::build(1, 1, Bandwidth::Absolute(1)).unwrap();
        let m = CostMatrix::build(&q, &r, &region, 4).unwrap();
        let v = m.get(0, 0).unwrap();
        assert_eq!(v, round_half_up(v, 4));
        assert!((v - 1.1119).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn error_region_shape_mismatch() {
        let q = line(1, &[0.0, 0.01]);
        let r = line(2, &[0.0, 0.01]);
        let region = ConstraintRegion::build(3, 2, Bandwidth::Absolute(1)).unwrap();
        assert!(matches!(
            CostMatrix::build(&q, &r, &region, 4),
            Err(DtwError::RegionShapeMismatch { region_rows: 3, query_len: 2 })
        ));
    }

    #[test]
    fn display_marks_unreachable() {
        let m = CostMatrix::from_cells(2, 2, vec![Some(0.0), None, Some(1.23456), Some(2.0)]);
        assert_eq!(m.to_string(), "[0.0000, -]\n[1.2346, 2.0000]\n");
    }
}
