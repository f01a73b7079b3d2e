//! Seeded synthetic series for demos, tests and benches.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::HaarError;

/// Draw `len` integer-valued samples uniformly from `range`, returned as `f64`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::EmptyRange`] | `range` contains no values |
pub fn random_series<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    range: RangeInclusive<i64>,
) -> Result<Vec<f64>, HaarError> {
    if range.is_empty() {
        return Err(HaarError::EmptyRange {
            low: *range.start(),
            high: *range.end(),
        });
    }
    Ok((0..len).map(|_| rng.gen_range(range.clone()) as f64).collect())
}
