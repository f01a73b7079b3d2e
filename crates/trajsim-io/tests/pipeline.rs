//! End-to-end integration tests: CSV -> align/search -> JSON -> deserialize.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trajsim_dtw::{Bandwidth, Dtw, TrajectoryId};
use trajsim_haar::{CandidateSet, SearchConfig, transform};
use trajsim_io::{
    AlignmentSummary, ExperimentName, PointReader, ResultWriter, SearchSummary, SeriesReader,
    find_trajectory, group_trajectories,
};

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn alignment_round_trip() {
    // 1. Read points and group them
    let points = PointReader::new(&fixture_path("points.csv"))
        .read()
        .expect("fixture should parse");
    assert_eq!(points.len(), 11);

    let trajectories = group_trajectories(points).unwrap();
    let ids: Vec<i64> = trajectories.iter().map(|t| t.id().value()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let query = find_trajectory(&trajectories, TrajectoryId::new(1)).unwrap();
    let reference = find_trajectory(&trajectories, TrajectoryId::new(2)).unwrap();
    assert_eq!(query.len(), 4);
    assert_eq!(reference.len(), 5);

    // Rows were shuffled in the file; grouping restores time order.
    let times: Vec<_> = query.points().iter().map(|p| p.timestamp()).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));

    // 2. Align
    let alignment = Dtw::new(Bandwidth::Absolute(2))
        .align(query, reference)
        .unwrap();
    assert!(alignment.cost.is_finite());
    assert!(alignment.cost > 0.0);

    // 3. Write JSON artifact
    let dir = TempDir::new().unwrap();
    let experiment = ExperimentName::new("align_rt".into()).unwrap();
    let writer = ResultWriter::new(dir.path(), experiment).unwrap();
    let json_path = writer
        .write_alignment(&AlignmentSummary::new(query, reference, &alignment))
        .unwrap();

    // 4. Deserialize back and verify
    let content = read_json(&json_path);
    assert_eq!(content["experiment"], "align_rt");
    assert_eq!(content["query"], 1);
    assert_eq!(content["reference"], 2);
    assert_eq!(content["reference_len"], 5);

    let path: Vec<(u64, u64)> = content["path"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p[0].as_u64().unwrap(), p[1].as_u64().unwrap()))
        .collect();
    assert_eq!(path.first(), Some(&(0, 0)));
    assert_eq!(path.last(), Some(&(3, 4)));
    for w in path.windows(2) {
        let (di, dj) = (w[1].0 - w[0].0, w[1].1 - w[0].1);
        assert!(di <= 1 && dj <= 1 && di + dj >= 1, "non-monotone step {w:?}");
    }

    let cost = content["cost"].as_f64().unwrap();
    assert!((cost - alignment.cost).abs() < 1e-12);
}

#[test]
fn search_round_trip() {
    // 1. Read series and decompose
    let dataset = SeriesReader::new(&fixture_path("series.csv"))
        .read()
        .expect("fixture should parse");
    assert_eq!(dataset.len(), 5);

    let query = transform(dataset.get("Q").unwrap()).unwrap();
    let labels: Vec<String> = dataset
        .ids
        .iter()
        .filter(|id| id.as_str() != "Q")
        .map(|id| id.as_str().to_string())
        .collect();
    let mut candidates = CandidateSet::from_series(
        labels
            .iter()
            .map(|id| transform(dataset.get(id).unwrap()).unwrap()),
    )
    .unwrap();

    // 2. Search: P2 and P4 both sit at squared distance 3 from Q
    let result = SearchConfig::new(2)
        .unwrap()
        .search(&query, &mut candidates)
        .unwrap();
    assert_eq!(result.positions(), vec![1, 3]);
    for survivor in &result.survivors {
        assert!(survivor.bounds.contains(3.0, 1e-9));
    }

    // 3. Write JSON artifact
    let dir = TempDir::new().unwrap();
    let experiment = ExperimentName::new("search_rt".into()).unwrap();
    let writer = ResultWriter::new(dir.path(), experiment).unwrap();
    let json_path = writer
        .write_search(&SearchSummary::new("Q", 2, &labels, &result))
        .unwrap();

    // 4. Deserialize back and verify
    let content = read_json(&json_path);
    assert_eq!(content["experiment"], "search_rt");
    assert_eq!(content["query"], "Q");
    assert_eq!(content["candidates"], 4);

    let ids: Vec<&str> = content["survivors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["P2", "P4"]);

    let rounds = content["rounds"].as_array().unwrap();
    assert!(!rounds.is_empty());
    let pruned: u64 = rounds.iter().map(|r| r["pruned"].as_u64().unwrap()).sum();
    assert_eq!(pruned, 2);
}

#[test]
fn non_power_of_two_series_rejected_at_transform() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("odd.csv");
    fs::write(&csv, "series_id,v0,v1,v2\nA,1,2,3\n").unwrap();

    let dataset = SeriesReader::new(&csv).read().unwrap();
    assert!(transform(&dataset.series[0]).is_err());
}
