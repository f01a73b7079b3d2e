//! Sakoe-Chiba constraint regions for banded DTW.

use std::ops::Range;

use tracing::instrument;

use crate::error::DtwError;

/// Width of the Sakoe-Chiba band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bandwidth {
    /// Half-width given as an absolute number of reference columns.
    Absolute(usize),

    /// Width given as a fraction of the reference length. The effective
    /// half-width is `fraction * ref_len / 2 + 1`.
    Fraction(f64),
}

impl Bandwidth {
    /// Return the half-width of the band for a reference of `ref_len` points.
    #[must_use]
    pub fn half_width(&self, ref_len: usize) -> f64 {
        match *self {
            Self::Absolute(columns) => columns as f64,
            Self::Fraction(fraction) => fraction * ref_len as f64 / 2.0 + 1.0,
        }
    }

    fn validate(&self) -> Result<(), DtwError> {
        match *self {
            Self::Absolute(_) => Ok(()),
            Self::Fraction(value) if value.is_finite() && value >= 0.0 => Ok(()),
            Self::Fraction(value) => Err(DtwError::InvalidBandwidth { value }),
        }
    }
}

/// Admissible column interval for every query row.
///
/// Row `i` admits columns `lower[i]..=upper[i]`. `upper` may equal the
/// reference length (one past the last column) because the band follows the
/// diagonal projection `i / (query_len - 1) * ref_len`, which reaches
/// `ref_len` on the final row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRegion {
    lower: Vec<usize>,
    upper: Vec<usize>,
    ref_len: usize,
}

/// Round to the nearest integer, ties toward positive infinity.
fn round_nearest(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

impl ConstraintRegion {
    /// Build the band for a `query_len` x `ref_len` cost matrix.
    ///
    /// Boundary policy for each row's raw interval `[round(diag - h), round(diag + h)]`:
    ///
    /// | Bound | Condition | Clamped to |
    /// |---|---|---|
    /// | lower | `< 0` | `0` |
    /// | lower | `>= ref_len` | `ref_len - floor(h)` |
    /// | upper | `<= 0` | `floor(h)` |
    /// | upper | `> ref_len` | `ref_len` |
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptyTrajectory`] | `query_len` or `ref_len` is zero |
    /// | [`DtwError::InvalidBandwidth`] | Fractional bandwidth is negative or non-finite |
    #[instrument(level = "debug")]
    pub fn build(query_len: usize, ref_len: usize, bandwidth: Bandwidth) -> Result<Self, DtwError> {
        if query_len == 0 || ref_len == 0 {
            return Err(DtwError::EmptyTrajectory);
        }
        bandwidth.validate()?;

        let half = bandwidth.half_width(ref_len);
        let half_floor = half.floor() as i64;
        let cols = ref_len as i64;

        let mut lower = Vec::with_capacity(query_len);
        let mut upper = Vec::with_capacity(query_len);

        for row in 0..query_len {
            let diag = if query_len == 1 {
                0.0
            } else {
                row as f64 / (query_len - 1) as f64 * ref_len as f64
            };

            let lo = match round_nearest(diag - half) {
                l if l < 0 => 0,
                l if l >= cols => (cols - half_floor).max(0),
                l => l,
            };
            let hi = match round_nearest(diag + half) {
                u if u <= 0 => half_floor,
                u if u > cols => cols,
                u => u,
            };
            debug_assert!(lo <= hi, "row {row}: lower {lo} exceeds upper {hi}");

            lower.push(lo as usize);
            upper.push(hi as usize);
        }

        Ok(Self {
            lower,
            upper,
            ref_len,
        })
    }

    /// Return the per-row lower bounds.
    #[must_use]
    pub fn lower(&self) -> &[usize] {
        &self.lower
    }

    /// Return the per-row upper bounds (inclusive).
    #[must_use]
    pub fn upper(&self) -> &[usize] {
        &self.upper
    }

    /// Return the number of query rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Return true if the region has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Return the reference length the region was built for.
    #[must_use]
    pub fn ref_len(&self) -> usize {
        self.ref_len
    }

    /// Return true if `(row, col)` lies inside the band.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.lower.len() && self.lower[row] <= col && col <= self.upper[row]
    }

    /// Return the existing matrix columns admitted for `row`.
    ///
    /// The interval is intersected with `0..ref_len`, so the result may be
    /// empty when the band's lower bound sits on the reference length.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    #[must_use]
    pub fn column_range(&self, row: usize) -> Range<usize> {
        let start = self.lower[row].min(self.ref_len);
        let end = (self.upper[row] + 1).min(self.ref_len);
        start..end.max(start)
    }

    /// Verify that a monotone path can run from `(0, 0)` to the terminal cell.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::UnreachableTerminal`] | Last row's interval excludes the last column |
    /// | [`DtwError::DisconnectedRegion`] | A row starts more than one column past the previous row's end |
    pub fn check_connected(&self) -> Result<(), DtwError> {
        let last_row = self.len().saturating_sub(1);
        let last_col = self.ref_len - 1;
        if !self.contains(last_row, last_col) {
            return Err(DtwError::UnreachableTerminal {
                row: last_row,
                col: last_col,
            });
        }

        for row in 0..last_row {
            if self.lower[row + 1] > self.upper[row] + 1 {
                return Err(DtwError::DisconnectedRegion {
                    row,
                    next_row: row + 1,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_band_square() {
        let region = ConstraintRegion::build(8, 8, Bandwidth::Absolute(2)).unwrap();
        assert_eq!(region.lower(), &[0, 0, 0, 1, 3, 4, 5, 6]);
        assert_eq!(region.upper(), &[2, 3, 4, 5, 7, 8, 8, 8]);
        assert!(region.contains(7, 7));
        assert!(region.check_connected().is_ok());
    }

    #[test]
    fn fractional_band() {
        // half-width = 0.2 * 10 / 2 + 1 = 2
        let region = ConstraintRegion::build(5, 10, Bandwidth::Fraction(0.2)).unwrap();
        assert_eq!(region.lower(), &[0, 1, 3, 6, 8]);
        assert_eq!(region.upper(), &[2, 5, 7, 10, 10]);
        assert_eq!(region.column_range(3), 6..10);
        assert!(region.check_connected().is_ok());
    }

    #[test]
    fn single_row_query() {
        let region = ConstraintRegion::build(1, 4, Bandwidth::Absolute(1)).unwrap();
        assert_eq!(region.lower(), &[0]);
        assert_eq!(region.upper(), &[1]);
    }

    #[test]
    fn zero_width_clamps_last_row_past_the_end() {
        let region = ConstraintRegion::build(3, 3, Bandwidth::Absolute(0)).unwrap();
        assert_eq!(region.lower(), &[0, 2, 3]);
        assert_eq!(region.upper(), &[0, 2, 3]);
        assert_eq!(region.column_range(2), 3..3);
        assert!(matches!(
            region.check_connected(),
            Err(DtwError::UnreachableTerminal { row: 2, col: 2 })
        ));
    }

    #[test]
    fn disconnected_rows_detected() {
        let region = ConstraintRegion::build(3, 9, Bandwidth::Absolute(1)).unwrap();
        assert_eq!(region.lower(), &[0, 4, 8]);
        assert_eq!(region.upper(), &[1, 6, 9]);
        assert!(matches!(
            region.check_connected(),
            Err(DtwError::DisconnectedRegion { row: 0, next_row: 1 })
        ));
    }

    #[test]
    fn error_empty_dimension() {
        assert!(matches!(
            ConstraintRegion::build(0, 4, Bandwidth::Absolute(1)),
            Err(DtwError::EmptyTrajectory)
        ));
        assert!(matches!(
            ConstraintRegion::build(4, 0, Bandwidth::Absolute(1)),
            Err(DtwError::EmptyTrajectory)
        ));
    }

    #[test]
    fn error_negative_fraction() {
        assert!(matches!(
            ConstraintRegion::build(4, 4, Bandwidth::Fraction(-0.1)),
            Err(DtwError::InvalidBandwidth { .. })
        ));
        assert!(matches!(
            ConstraintRegion::build(4, 4, Bandwidth::Fraction(f64::NAN)),
            Err(DtwError::InvalidBandwidth { .. })
        ));
    }

    #[test]
    fn half_width_modes() {
        assert_eq!(Bandwidth::Absolute(3).half_width(100), 3.0);
        assert_eq!(Bandwidth::Fraction(0.5).half_width(10), 3.5);
    }
}
