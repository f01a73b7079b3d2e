//! Unnormalized Haar wavelet transform and its inverse.

use tracing::instrument;

use crate::error::HaarError;
use crate::level::level_count;
use crate::series::HaarSeries;

/// Decompose `series` by repeated pairwise averaging and differencing.
///
/// Each pass halves the working prefix: pair `(a, b)` yields the average
/// `(a + b) / 2` and the detail `(a - b) / 2`. Passes continue down to a
/// single average, so `[2, 4, 6, 8, 3, 5, 7, 5]` becomes
/// `[5, 0, -2, -1, -1, -1, -1, 1]`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::NotPowerOfTwo`] | Length is not a power of two >= 2 |
/// | [`HaarError::NonFiniteValue`] | A sample is NaN or infinite |
#[instrument(level = "debug", skip_all, fields(len = series.len()))]
pub fn transform(series: &[f64]) -> Result<HaarSeries, HaarError> {
    let levels = level_count(series.len())?;
    if let Some(index) = series.iter().position(|v| !v.is_finite()) {
        return Err(HaarError::NonFiniteValue { index });
    }

    let mut work = series.to_vec();
    let mut out = vec![0.0; series.len()];
    let mut size = series.len() / 2;

    loop {
        for i in 0..size {
            let (a, b) = (work[2 * i], work[2 * i + 1]);
            out[i] = (a + b) / 2.0;
            out[size + i] = (a - b) / 2.0;
        }
        work[..size].copy_from_slice(&out[..size]);
        if size == 1 {
            break;
        }
        size /= 2;
    }

    Ok(HaarSeries::from_parts(out, levels))
}

/// Reconstruct the original samples from a decomposition.
#[must_use]
pub fn inverse(haar: &HaarSeries) -> Vec<f64> {
    let coeffs = haar.coefficients();
    let mut work = vec![0.0; coeffs.len()];
    let mut next = vec![0.0; coeffs.len()];
    work[0] = coeffs[0];

    let mut size = 1;
    while size < coeffs.len() {
        for i in 0..size {
            let (avg, diff) = (work[i], coeffs[size + i]);
            next[2 * i] = avg + diff;
            next[2 * i + 1] = avg - diff;
        }
        work[..2 * size].copy_from_slice(&next[..2 * size]);
        size *= 2;
    }
    work
}
