//! Great-circle distance and decimal rounding for cost matrix cells.

use crate::point::Point;

/// Mean Earth radius used by the spherical approximation, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometres.
///
/// Spherical approximation, accurate to roughly 0.5%. The intermediate
/// haversine term is clamped to `[0, 1]` so identical and antipodal points
/// never feed a negative value to `sqrt`.
#[must_use]
pub fn haversine_km(a: &Point, b: &Point) -> f64 {
    haversine_km_raw(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}

/// [`haversine_km`] over raw latitude/longitude pairs in degrees.
#[must_use]
pub fn haversine_km_raw(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let phi_a = lat_a.to_radians();
    let phi_b = lat_b.to_radians();
    let d_phi = (lat_b - lat_a).to_radians();
    let d_lambda = (lon_b - lon_a).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    let angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * angle
}

/// Round `value` to `places` decimals, ties away from zero.
///
/// Rounding is decided on the shortest decimal representation of `value`
/// rather than on its binary expansion, so `0.00005` becomes `0.0001` at four
/// places even though the nearest `f64` lies slightly below the tie.
#[must_use]
pub fn round_half_up(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let magnitude = value.abs();
    let repr = magnitude.to_string();
    let Some((whole, frac)) = repr.split_once('.') else {
        return value;
    };
    if frac.len() <= places {
        return value;
    }

    let kept = if places == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{}", &frac[..places])
    };
    let truncated: f64 = kept.parse().unwrap_or(magnitude);

    let rounded = if frac.as_bytes()[places] >= b'5' {
        let bumped = truncated + 10f64.powi(-(places as i32));
        // Re-render to shed the binary noise introduced by the addition.
        format!("{bumped:.places$}").parse().unwrap_or(bumped)
    } else {
        truncated
    };

    rounded.copysign(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_km_raw(55.6761, 12.5683, 55.6761, 12.5683), 0.0);
    }

    #[test]
    fn copenhagen_to_aarhus() {
        // ~157 km along the great circle
        let d = haversine_km_raw(55.6761, 12.5683, 56.1629, 10.2039);
        assert!((d - 157.0).abs() < 2.0, "got {d}");
    }

    #[test]
    fn antipodal_points_do_not_nan() {
        let d = haversine_km_raw(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn symmetric() {
        let ab = haversine_km_raw(48.8566, 2.3522, 51.5074, -0.1278);
        let ba = haversine_km_raw(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn round_half_up_basic() {
        assert_eq!(round_half_up(1.23456, 4), 1.2346);
        assert_eq!(round_half_up(1.23454, 4), 1.2345);
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(0.1, 4), 0.1);
        assert_eq!(round_half_up(7.0, 4), 7.0);
    }

    #[test]
    fn round_half_up_decimal_tie() {
        assert_eq!(round_half_up(0.00005, 4), 0.0001);
        assert_eq!(round_half_up(1.00005, 4), 1.0001);
        assert_eq!(round_half_up(0.99995, 4), 1.0);
    }

    #[test]
    fn round_half_up_negative_away_from_zero() {
        assert_eq!(round_half_up(-1.00005, 4), -1.0001);
        assert_eq!(round_half_up(-0.00004, 4), -0.0);
    }

    #[test]
    fn round_half_up_passes_non_finite() {
        assert!(round_half_up(f64::NAN, 4).is_nan());
        assert_eq!(round_half_up(f64::INFINITY, 4), f64::INFINITY);
    }
}
