//! Banded DTW alignment of GPS trajectories.
//!
//! Pure math library, no I/O. Provides haversine point distances, Sakoe-Chiba
//! constraint regions, the banded cost matrix, warping path backtrace and
//! seeded Gaussian noise injection for trajectories.

mod constraint;
mod distance;
mod dtw;
mod error;
mod matrix;
mod noise;
mod path;
mod point;

pub use constraint::{Bandwidth, ConstraintRegion};
pub use distance::{EARTH_RADIUS_KM, haversine_km, haversine_km_raw, round_half_up};
pub use dtw::{Alignment, Dtw, backtrace};
pub use error::DtwError;
pub use matrix::CostMatrix;
pub use noise::add_noise;
pub use path::{WarpingPath, WarpingStep};
pub use point::{Point, Trajectory, TrajectoryId};
