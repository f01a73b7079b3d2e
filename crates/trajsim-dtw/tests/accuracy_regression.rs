//! Accuracy regression tests for trajsim-dtw.
//!
//! Hand-computed alignments guard the cost matrix rounding and the backtrace
//! tie order; property tests cover the structural laws of regions and paths.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use trajsim_dtw::{
    Bandwidth, ConstraintRegion, Dtw, Point, Trajectory, TrajectoryId, add_noise, haversine_km,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 9, 2)
        .expect("valid date")
        .and_hms_opt(7, 30, 0)
        .expect("valid time")
}

fn trajectory(id: i64, coords: &[(f64, f64)]) -> Trajectory {
    let points = coords
        .iter()
        .enumerate()
        .map(|(i, &(lat, lon))| {
            Point::new(
                t0() + chrono::Duration::seconds(5 * i as i64),
                lat,
                lon,
                TrajectoryId::new(id),
            )
        })
        .collect();
    Trajectory::new(points).expect("valid test trajectory")
}

fn meridian(id: i64, lats: &[f64]) -> Trajectory {
    let coords: Vec<(f64, f64)> = lats.iter().map(|&lat| (lat, 0.0)).collect();
    trajectory(id, &coords)
}

// ---------------------------------------------------------------------------
// Golden alignments
// ---------------------------------------------------------------------------

/// 0.01 degrees along a meridian is 1.11195 km, stored as 1.1119.
#[test]
fn golden_three_by_two_alignment() {
    let q = meridian(1, &[0.0, 0.01, 0.02]);
    let r = meridian(2, &[0.0, 0.02]);
    let alignment = Dtw::new(Bandwidth::Absolute(2)).align(&q, &r).unwrap();

    assert_eq!(alignment.region.lower(), &[0, 0, 0]);
    assert_eq!(alignment.region.upper(), &[2, 2, 2]);

    let m = &alignment.matrix;
    assert_eq!(m.get(0, 0), Some(0.0));
    assert_eq!(m.get(0, 1), Some(2.2239));
    assert_eq!(m.get(1, 0), Some(1.1119));
    assert_eq!(m.get(1, 1), Some(1.1119));
    assert_eq!(m.get(2, 0), Some(2.2239));
    assert_eq!(m.get(2, 1), Some(0.0));

    // (2,1): diagonal and up tie at 1.1119, diagonal wins.
    assert_eq!(alignment.path.index_pairs(), vec![(0, 0), (1, 0), (2, 1)]);
    assert!((alignment.cost - 1.1119).abs() < 1e-12);
}

#[test]
fn golden_square_band_region_and_endpoints() {
    let lats: Vec<f64> = (0..8).map(|i| 0.01 * i as f64).collect();
    let q = meridian(1, &lats);
    let r = meridian(2, &lats);
    let alignment = Dtw::new(Bandwidth::Absolute(2)).align(&q, &r).unwrap();

    assert_eq!(alignment.region.lower(), &[0, 0, 0, 1, 3, 4, 5, 6]);
    assert_eq!(alignment.region.upper(), &[2, 3, 4, 5, 7, 8, 8, 8]);
    assert_eq!(
        alignment.path.index_pairs(),
        (0..8).map(|i| (i, i)).collect::<Vec<_>>()
    );
    assert_eq!(alignment.cost, 0.0);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn noisy_copy_is_closer_than_reversed_route() {
    let coords: Vec<(f64, f64)> = (0..30)
        .map(|i| (55.60 + 0.002 * i as f64, 12.50 + 0.003 * i as f64))
        .collect();
    let original = trajectory(1, &coords);

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let noisy = add_noise(&original, 0.0002, &mut rng).unwrap();

    let reversed_coords: Vec<(f64, f64)> = coords.iter().rev().copied().collect();
    let reversed = trajectory(2, &reversed_coords);

    let dtw = Dtw::new(Bandwidth::Fraction(0.2));
    let near = dtw.align(&original, &noisy).unwrap();
    let far = dtw.align(&original, &reversed).unwrap();
    assert!(near.cost < far.cost, "{} vs {}", near.cost, far.cost);
}

#[test]
fn unequal_lengths_reach_terminal() {
    let q = meridian(1, &[0.0, 0.005, 0.01, 0.015, 0.02]);
    let r = meridian(2, &[0.0, 0.002, 0.004, 0.006, 0.008, 0.01, 0.012, 0.014, 0.016, 0.018]);
    let alignment = Dtw::new(Bandwidth::Fraction(0.2)).align(&q, &r).unwrap();
    assert_eq!(alignment.path.index_pairs().last(), Some(&(4, 9)));
    assert!(alignment.path.len() >= 10);
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

fn coordinate() -> impl Strategy<Value = (f64, f64)> {
    (-60.0f64..60.0, -170.0f64..170.0)
}

fn bandwidth() -> impl Strategy<Value = Bandwidth> {
    prop_oneof![
        (0usize..12).prop_map(Bandwidth::Absolute),
        (0.0f64..2.0).prop_map(Bandwidth::Fraction),
    ]
}

/// `round(row / (query_len - 1) * ref_len)` clamped to `[0, ref_len]`.
fn projected_diagonal(row: usize, query_len: usize, ref_len: usize) -> usize {
    if query_len == 1 {
        return 0;
    }
    let diag = row as f64 / (query_len - 1) as f64 * ref_len as f64;
    ((diag + 0.5).floor() as usize).min(ref_len)
}

proptest! {
    #[test]
    fn distance_is_symmetric_and_non_negative(a in coordinate(), b in coordinate()) {
        let p = trajectory(1, &[a]);
        let q = trajectory(2, &[b]);
        let ab = haversine_km(&p[0], &q[0]);
        let ba = haversine_km(&q[0], &p[0]);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert_eq!(haversine_km(&p[0], &p[0]), 0.0);
    }

    #[test]
    fn region_rows_are_ordered_and_bounded(
        query_len in 1usize..60,
        ref_len in 1usize..60,
        bandwidth in bandwidth(),
    ) {
        let region = ConstraintRegion::build(query_len, ref_len, bandwidth).unwrap();
        prop_assert_eq!(region.len(), query_len);
        for row in 0..query_len {
            prop_assert!(region.lower()[row] <= region.upper()[row]);
            prop_assert!(region.upper()[row] <= ref_len);
        }
    }

    #[test]
    fn region_rows_contain_projected_diagonal(
        query_len in 1usize..60,
        ref_len in 1usize..60,
        bandwidth in bandwidth(),
    ) {
        let region = ConstraintRegion::build(query_len, ref_len, bandwidth).unwrap();
        for row in 0..query_len {
            let diag = projected_diagonal(row, query_len, ref_len);
            prop_assert!(
                region.lower()[row] <= diag && diag <= region.upper()[row],
                "row {} diag {} outside [{}, {}]",
                row, diag, region.lower()[row], region.upper()[row]
            );
        }
    }

    #[test]
    fn connected_bands_yield_monotone_paths(
        q in prop::collection::vec(coordinate(), 1..25),
        r in prop::collection::vec(coordinate(), 1..25),
        fraction in 0.0f64..1.0,
    ) {
        let query = trajectory(1, &q);
        let reference = trajectory(2, &r);
        let dtw = Dtw::new(Bandwidth::Fraction(fraction));

        // Steep shapes (few rows, many columns) can leave a gap between rows.
        let region = dtw.region(q.len(), r.len()).unwrap();
        prop_assume!(region.check_connected().is_ok());

        let result = dtw.align(&query, &reference);
        prop_assert!(result.is_ok(), "connected band failed to align: {:?}", result.err());
        let alignment = result.unwrap();

        let pairs = alignment.path.index_pairs();
        prop_assert_eq!(pairs.first(), Some(&(0, 0)));
        prop_assert_eq!(pairs.last(), Some(&(q.len() - 1, r.len() - 1)));
        prop_assert!(pairs.len() >= q.len().max(r.len()));
        prop_assert!(pairs.len() <= q.len() + r.len() - 1);

        for w in pairs.windows(2) {
            let (dr, dc) = (w[1].0 - w[0].0, w[1].1 - w[0].1);
            prop_assert!(matches!((dr, dc), (1, 0) | (0, 1) | (1, 1)));
        }
        for &(row, col) in &pairs {
            prop_assert!(alignment.region.contains(row, col));
        }
        prop_assert!(alignment.cost >= 0.0);
    }
}
