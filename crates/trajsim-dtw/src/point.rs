//! Geolocated samples and validated trajectories.

use std::fmt;
use std::ops::Index;

use chrono::NaiveDateTime;

use crate::error::DtwError;

/// Identifier shared by every point of one trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrajectoryId(i64);

impl TrajectoryId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the raw identifier.
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TrajectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single timestamped GPS sample. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    timestamp: NaiveDateTime,
    latitude: f64,
    longitude: f64,
    trajectory_id: TrajectoryId,
}

impl Point {
    /// Create a point. Coordinates are validated when the point joins a [`Trajectory`].
    #[must_use]
    pub fn new(
        timestamp: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        trajectory_id: TrajectoryId,
    ) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            trajectory_id,
        }
    }

    /// Return the sample time.
    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Return the latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return the longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Return the owning trajectory's identifier.
    #[must_use]
    pub fn trajectory_id(&self) -> TrajectoryId {
        self.trajectory_id
    }

    /// Return a copy of this point moved to new coordinates.
    #[must_use]
    pub fn with_position(&self, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..*self
        }
    }

    fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Owned, validated trajectory.
///
/// Guaranteed non-empty, every point shares one [`TrajectoryId`], every
/// coordinate is finite and in range, and timestamps never decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    id: TrajectoryId,
    points: Vec<Point>,
}

impl Trajectory {
    /// Create a trajectory from points already grouped and sorted by time.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptyTrajectory`] | `points` is empty |
    /// | [`DtwError::MixedTrajectoryIds`] | A point's id differs from the first point's |
    /// | [`DtwError::InvalidCoordinate`] | A coordinate is non-finite or out of range |
    /// | [`DtwError::OutOfOrder`] | A timestamp is earlier than its predecessor's |
    pub fn new(points: Vec<Point>) -> Result<Self, DtwError> {
        let first = points.first().ok_or(DtwError::EmptyTrajectory)?;
        let id = first.trajectory_id;

        for (index, p) in points.iter().enumerate() {
            if p.trajectory_id != id {
                return Err(DtwError::MixedTrajectoryIds {
                    expected: id.value(),
                    found: p.trajectory_id.value(),
                    index,
                });
            }
            if !p.has_valid_coordinates() {
                return Err(DtwError::InvalidCoordinate {
                    index,
                    latitude: p.latitude,
                    longitude: p.longitude,
                });
            }
        }

        if let Some(pos) = points
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
        {
            return Err(DtwError::OutOfOrder { index: pos + 1 });
        }

        Ok(Self { id, points })
    }

    /// Return the shared identifier.
    #[must_use]
    pub fn id(&self) -> TrajectoryId {
        self.id
    }

    /// Return the points in time order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return true if the trajectory has no points.
    ///
    /// Always `false` for instances built through [`Trajectory::new`]; provided
    /// for the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume and return the points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl Index<usize> for Trajectory {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl TryFrom<Vec<Point>> for Trajectory {
    type Error = DtwError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}
