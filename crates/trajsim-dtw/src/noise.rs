//! Gaussian perturbation of trajectory coordinates.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::DtwError;
use crate::point::Trajectory;

/// Return a copy of `trajectory` with independent N(0, sigma²) offsets added
/// to every latitude and longitude.
///
/// Timestamps and the trajectory id are unchanged. Perturbed latitudes are
/// clamped to `[-90, 90]` and longitudes wrapped into `[-180, 180)`, so the
/// result always passes [`Trajectory::new`] validation.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::InvalidNoise`] | `sigma` is negative or non-finite |
pub fn add_noise<R: Rng + ?Sized>(
    trajectory: &Trajectory,
    sigma: f64,
    rng: &mut R,
) -> Result<Trajectory, DtwError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(DtwError::InvalidNoise { sigma });
    }
    let normal = Normal::new(0.0, sigma).map_err(|_| DtwError::InvalidNoise { sigma })?;

    let points = trajectory
        .points()
        .iter()
        .map(|p| {
            let lat = (p.latitude() + normal.sample(rng)).clamp(-90.0, 90.0);
            let lon = wrap_longitude(p.longitude() + normal.sample(rng));
            p.with_position(lat, lon)
        })
        .collect();

    debug!(id = %trajectory.id(), sigma, "noise applied");
    Trajectory::new(points)
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
