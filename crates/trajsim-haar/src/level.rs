//! Dyadic level addressing inside a Haar coefficient vector.
//!
//! A decomposition of `N = 2^n` samples has `n` levels. Two numbering schemes
//! are in use:
//!
//! | Scheme    | Level 1     | Level `n`   | Index range of level `l`       |
//! |-----------|-------------|-------------|--------------------------------|
//! | bottom-up | finest      | coarsest    | `[N / 2^l, N / 2^(l-1))`        |
//! | top-down  | coarsest    | finest      | `[2^(l-1), 2^l)`                |
//!
//! The coarsest level in both schemes also owns index 0 (the overall
//! average), so the levels partition `0..N` exactly. Bottom-up level `l`
//! carries weight `2^l` in the squared Euclidean decomposition.

use std::ops::Range;

use crate::error::HaarError;

/// Return the number of levels `n` for a series of length `2^n`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::NotPowerOfTwo`] | `len` is not a power of two, or is less than 2 |
pub fn level_count(len: usize) -> Result<u32, HaarError> {
    if len < 2 || !len.is_power_of_two() {
        return Err(HaarError::NotPowerOfTwo { len });
    }
    Ok(len.trailing_zeros())
}

fn check_level(level: u32, max_depth: u32) -> Result<(), HaarError> {
    if level == 0 || level > max_depth {
        return Err(HaarError::InvalidDepth {
            depth: level,
            max_depth,
        });
    }
    Ok(())
}

/// Return the coefficient indices of bottom-up `level` for a series of `len`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::NotPowerOfTwo`] | `len` is not a power of two >= 2 |
/// | [`HaarError::InvalidDepth`] | `level` is outside `1..=level_count(len)` |
pub fn bottom_up_range(len: usize, level: u32) -> Result<Range<usize>, HaarError> {
    let levels = level_count(len)?;
    check_level(level, levels)?;
    Ok(bottom_up_unchecked(len, levels, level))
}

/// Return the coefficient indices of top-down `level` for a series of `len`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HaarError::NotPowerOfTwo`] | `len` is not a power of two >= 2 |
/// | [`HaarError::InvalidDepth`] | `level` is outside `1..=level_count(len)` |
pub fn top_down_range(len: usize, level: u32) -> Result<Range<usize>, HaarError> {
    let levels = level_count(len)?;
    check_level(level, levels)?;
    Ok(bottom_up_unchecked(len, levels, levels - level + 1))
}

pub(crate) fn bottom_up_unchecked(len: usize, levels: u32, level: u32) -> Range<usize> {
    let end = len >> (level - 1);
    if level == levels { 0..end } else { (len >> level)..end }
}

/// Weight of bottom-up `level` in the squared Euclidean decomposition.
#[must_use]
pub fn level_weight(level: u32) -> f64 {
    2f64.powi(level as i32)
}

/// Three-valued sign: `-1`, `0` or `1`.
pub(crate) fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}
