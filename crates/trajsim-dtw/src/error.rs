//! Error types for trajectory validation, constraint regions and DTW alignment.

/// Errors from trajectory construction, constraint region building and
/// warping path extraction.
///
/// Variants fall into two classes: *precondition* errors describe malformed
/// input data, *configuration* errors describe a band that cannot produce a
/// valid alignment. See [`DtwError::is_configuration`].
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when a trajectory (or a requested dimension) has no points.
    #[error("trajectory must be non-empty")]
    EmptyTrajectory,

    /// Returned when a point carries a different identifier than the first point.
    #[error("point {index} belongs to trajectory {found}, expected {expected}")]
    MixedTrajectoryIds {
        /// Identifier of the first point.
        expected: i64,
        /// Identifier of the offending point.
        found: i64,
        /// Position of the offending point.
        index: usize,
    },

    /// Returned when a latitude/longitude is NaN, infinite, or out of range.
    #[error("point {index} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Position of the offending point.
        index: usize,
        /// Latitude as supplied.
        latitude: f64,
        /// Longitude as supplied.
        longitude: f64,
    },

    /// Returned when timestamps decrease between consecutive points.
    #[error("point {index} is earlier than its predecessor")]
    OutOfOrder {
        /// Position of the first point that breaks the ordering.
        index: usize,
    },

    /// Returned when a noise standard deviation is negative or non-finite.
    #[error("noise standard deviation must be finite and non-negative, got {sigma}")]
    InvalidNoise {
        /// The rejected standard deviation.
        sigma: f64,
    },

    /// Returned when a bandwidth is negative or non-finite.
    #[error("bandwidth must be finite and non-negative, got {value}")]
    InvalidBandwidth {
        /// The rejected bandwidth.
        value: f64,
    },

    /// Returned when a constraint region was built for a different query length.
    #[error("constraint region has {region_rows} rows but the query has {query_len} points")]
    RegionShapeMismatch {
        /// Number of rows in the region.
        region_rows: usize,
        /// Number of points in the query trajectory.
        query_len: usize,
    },

    /// Returned when the band excludes the terminal cell of the cost matrix.
    #[error("terminal cell ({row}, {col}) lies outside the constraint region")]
    UnreachableTerminal {
        /// Last query row.
        row: usize,
        /// Last reference column.
        col: usize,
    },

    /// Returned when two consecutive rows of the band do not touch.
    #[error("constraint region is disconnected between rows {row} and {next_row}")]
    DisconnectedRegion {
        /// Row whose interval ends too early.
        row: usize,
        /// Following row whose interval starts too late.
        next_row: usize,
    },

    /// Returned when backtracing can only continue through unreachable cells.
    #[error("warping path is blocked at cell ({row}, {col})")]
    BlockedPath {
        /// Row of the last reachable cell.
        row: usize,
        /// Column of the last reachable cell.
        col: usize,
    },
}

impl DtwError {
    /// Return true for errors caused by a band too narrow to connect the
    /// start and end cells, false for malformed input data.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidBandwidth { .. }
                | Self::UnreachableTerminal { .. }
                | Self::DisconnectedRegion { .. }
                | Self::BlockedPath { .. }
        )
    }
}
