//! JSON result writer for alignment and search outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use trajsim_dtw::{Alignment, Trajectory};
use trajsim_haar::SearchResult;

use crate::IoError;
use crate::domain::ExperimentName;

/// Serializable view of one DTW alignment.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentSummary {
    /// Query trajectory id.
    pub query: i64,
    /// Reference trajectory id.
    pub reference: i64,
    /// Number of query points.
    pub query_len: usize,
    /// Number of reference points.
    pub reference_len: usize,
    /// Sum of cell costs along the path, in kilometres.
    pub cost: f64,
    /// Number of cells inside the band.
    pub reachable_cells: usize,
    /// Per-row lower band limits.
    pub lower: Vec<usize>,
    /// Per-row upper band limits.
    pub upper: Vec<usize>,
    /// Warping path as `[row, col]` pairs.
    pub path: Vec<(usize, usize)>,
}

impl AlignmentSummary {
    /// Summarize `alignment` of `query` against `reference`.
    #[must_use]
    pub fn new(query: &Trajectory, reference: &Trajectory, alignment: &Alignment) -> Self {
        Self {
            query: query.id().value(),
            reference: reference.id().value(),
            query_len: query.len(),
            reference_len: reference.len(),
            cost: alignment.cost,
            reachable_cells: alignment.matrix.reachable_cells(),
            lower: alignment.region.lower().to_vec(),
            upper: alignment.region.upper().to_vec(),
            path: alignment.path.index_pairs(),
        }
    }
}

/// Serializable view of one pruning search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    /// Label of the query series.
    pub query: String,
    /// Requested number of neighbours.
    pub k: usize,
    /// Candidates entering the search.
    pub candidates: usize,
    /// Depth of the last evaluated round.
    pub final_depth: u32,
    /// Surviving candidates in insertion order.
    pub survivors: Vec<SurvivorEntry>,
    /// One entry per executed round.
    pub rounds: Vec<RoundEntry>,
}

/// One surviving candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SurvivorEntry {
    /// Position in the candidate collection.
    pub position: usize,
    /// Label of the candidate series.
    pub id: String,
    /// Lower distance bound at the final depth.
    pub lower: f64,
    /// Upper distance bound at the final depth.
    pub upper: f64,
}

/// One pruning round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundEntry {
    /// Depth the bounds were evaluated at.
    pub depth: u32,
    /// k-th smallest upper bound.
    pub threshold: f64,
    /// Alive candidates entering the round.
    pub alive_before: usize,
    /// Candidates discarded in the round.
    pub pruned: usize,
}

impl SearchSummary {
    /// Summarize `result`. `labels[i]` names the candidate at position `i`;
    /// positions without a label fall back to their number.
    #[must_use]
    pub fn new(query: &str, k: usize, labels: &[String], result: &SearchResult) -> Self {
        let survivors = result
            .survivors
            .iter()
            .map(|s| SurvivorEntry {
                position: s.position,
                id: labels
                    .get(s.position)
                    .cloned()
                    .unwrap_or_else(|| s.position.to_string()),
                lower: s.bounds.lower,
                upper: s.bounds.upper,
            })
            .collect();

        let rounds = result
            .rounds
            .iter()
            .map(|r| RoundEntry {
                depth: r.depth,
                threshold: r.threshold,
                alive_before: r.alive_before,
                pruned: r.pruned,
            })
            .collect();

        Self {
            query: query.to_string(),
            k,
            candidates: labels.len(),
            final_depth: result.final_depth,
            survivors,
            rounds,
        }
    }
}

/// Writes alignment and search results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_alignment.json` and
/// `{experiment}_search.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write an alignment summary to `{experiment}_alignment.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The summary cannot be rendered |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_alignment(&self, summary: &AlignmentSummary) -> Result<PathBuf, IoError> {
        self.write_artifact("alignment", summary)
    }

    /// Write a search summary to `{experiment}_search.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The summary cannot be rendered |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_search(&self, summary: &SearchSummary) -> Result<PathBuf, IoError> {
        self.write_artifact("search", summary)
    }

    fn write_artifact<T: Serialize>(&self, kind: &str, result: &T) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_{kind}.json", self.experiment.as_str()));

        let artifact = Artifact {
            experiment: self.experiment.as_str(),
            result,
        };
        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "{kind} result written");
        Ok(path)
    }
}

// --- Envelope for JSON serialization ---

#[derive(Serialize)]
struct Artifact<'a, T> {
    experiment: &'a str,
    #[serde(flatten)]
    result: &'a T,
}
