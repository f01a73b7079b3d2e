//! Grouping of loose points into validated trajectories.

use tracing::{info, instrument};

use trajsim_dtw::{Point, Trajectory, TrajectoryId};

use crate::IoError;

/// Group points into one trajectory per identifier.
///
/// Points are stably sorted by `(trajectory_id, timestamp)`; trajectories
/// come out in ascending id order and every group is emitted, including the
/// last one.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::InvalidTrajectory`] | A group fails trajectory validation (bad coordinates) |
#[instrument(skip_all, fields(n_points = points.len()))]
pub fn group_trajectories(mut points: Vec<Point>) -> Result<Vec<Trajectory>, IoError> {
    points.sort_by(|a, b| {
        a.trajectory_id()
            .cmp(&b.trajectory_id())
            .then(a.timestamp().cmp(&b.timestamp()))
    });

    let trajectories = points
        .chunk_by(|a, b| a.trajectory_id() == b.trajectory_id())
        .map(|group| {
            Trajectory::new(group.to_vec()).map_err(|source| IoError::InvalidTrajectory {
                trajectory_id: group[0].trajectory_id().value(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(n_trajectories = trajectories.len(), "points grouped");
    Ok(trajectories)
}

/// Return the trajectory with identifier `id`, if present.
#[must_use]
pub fn find_trajectory(trajectories: &[Trajectory], id: TrajectoryId) -> Option<&Trajectory> {
    trajectories.iter().find(|t| t.id() == id)
}
