//! Validated Haar coefficient vector.

use std::ops::Index;

use crate::error::HaarError;
use crate::level::{bottom_up_range, bottom_up_unchecked, level_count};

/// Haar decomposition of a series of length `2^n`, `n >= 1`.
///
/// Coefficients run from the overall average at index 0 through the finest
/// detail coefficients at the tail. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct HaarSeries {
    coeffs: Vec<f64>,
    levels: u32,
}

impl HaarSeries {
    /// Wrap coefficients that are already in Haar order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::NotPowerOfTwo`] | Length is not a power of two >= 2 |
    /// | [`HaarError::NonFiniteValue`] | A coefficient is NaN or infinite |
    pub fn from_coefficients(coeffs: Vec<f64>) -> Result<Self, HaarError> {
        let levels = level_count(coeffs.len())?;
        if let Some(index) = coeffs.iter().position(|c| !c.is_finite()) {
            return Err(HaarError::NonFiniteValue { index });
        }
        Ok(Self { coeffs, levels })
    }

    pub(crate) fn from_parts(coeffs: Vec<f64>, levels: u32) -> Self {
        debug_assert_eq!(coeffs.len(), 1usize << levels);
        Self { coeffs, levels }
    }

    /// Return all coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Return the number of coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Always `false`; a decomposition holds at least two coefficients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Return the number of dyadic levels.
    #[must_use]
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Return the overall average of the source series.
    #[must_use]
    pub fn average(&self) -> f64 {
        self.coeffs[0]
    }

    /// Return the coefficients of bottom-up `level`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HaarError::InvalidDepth`] | `level` is outside `1..=levels()` |
    pub fn level(&self, level: u32) -> Result<&[f64], HaarError> {
        Ok(&self.coeffs[bottom_up_range(self.len(), level)?])
    }

    pub(crate) fn level_unchecked(&self, level: u32) -> &[f64] {
        &self.coeffs[bottom_up_unchecked(self.len(), self.levels, level)]
    }

    /// Fail with [`HaarError::LengthMismatch`] unless `other` has the same length.
    pub(crate) fn check_same_len(&self, other: &Self) -> Result<(), HaarError> {
        if self.len() != other.len() {
            return Err(HaarError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }
}

impl Index<usize> for HaarSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coeffs[index]
    }
}
