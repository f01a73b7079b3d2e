/// Errors from Haar decomposition, bound estimation and pruning search.
///
/// Every variant is a precondition failure: the operation fails fast and
/// never returns a partial result.
#[derive(Debug, thiserror::Error)]
pub enum HaarError {
    /// Returned when a series length is not a power of two of at least 2.
    #[error("series length must be a power of two >= 2, got {len}")]
    NotPowerOfTwo {
        /// The rejected length.
        len: usize,
    },

    /// Returned when two series being compared differ in length.
    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first series.
        left: usize,
        /// Length of the second series.
        right: usize,
    },

    /// Returned when a series contains NaN or infinity.
    #[error("non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the offending value.
        index: usize,
    },

    /// Returned when a depth or level falls outside `1..=max_depth`.
    #[error("depth {depth} is outside 1..={max_depth}")]
    InvalidDepth {
        /// The requested depth.
        depth: u32,
        /// Number of levels in the decomposition.
        max_depth: u32,
    },

    /// Returned when k is zero.
    #[error("k must be at least 1, got {k}")]
    InvalidK {
        /// The invalid k value provided.
        k: usize,
    },

    /// Returned when a level weight, or a sign sum it scales, no longer fits in an `f64`.
    #[error("sign weight for level {level} overflows f64")]
    WeightOverflow {
        /// Level whose weight overflowed.
        level: u32,
    },

    /// Returned when a sampling range has no values.
    #[error("sampling range {low}..={high} is empty")]
    EmptyRange {
        /// Lower end of the range.
        low: i64,
        /// Upper end of the range.
        high: i64,
    },
}
