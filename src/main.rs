use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use trajsim_dtw::{Bandwidth, Dtw, TrajectoryId, add_noise};
use trajsim_haar::{CandidateSet, SearchConfig, SignWeighting, random_series, transform};
use trajsim_io::{
    AlignmentSummary, ExperimentName, PointReader, ResultWriter, SearchSummary, SeriesReader,
    find_trajectory, group_trajectories,
};

/// Sample range of synthetic series.
const SYNTHETIC_RANGE: std::ops::RangeInclusive<i64> = 1..=9;

#[derive(Parser)]
#[command(name = "trajsim")]
#[command(about = "Trajectory similarity: banded DTW alignment and Haar-wavelet k-NN pruning")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Align two trajectories with Sakoe-Chiba banded DTW
    Align {
        /// Path to the GPS point CSV file
        #[arg(long)]
        data: PathBuf,

        /// Trajectory id of the query
        #[arg(long)]
        query: i64,

        /// Trajectory id of the reference
        #[arg(long)]
        reference: i64,

        /// Band half-width in reference columns
        #[arg(long, conflicts_with = "band_fraction")]
        band: Option<usize>,

        /// Band width as a fraction of the reference length
        #[arg(long)]
        band_fraction: Option<f64>,

        /// Standard deviation (degrees) of Gaussian noise added to the reference
        #[arg(long)]
        noise: Option<f64>,

        /// The CSV file has no header row
        #[arg(long, default_value_t = false)]
        no_header: bool,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Find the k nearest series with stepwise Haar-bound pruning
    Search {
        /// Path to the numeric series CSV file
        #[arg(long, requires = "query", conflicts_with = "synthetic")]
        data: Option<PathBuf>,

        /// Series id of the query within --data
        #[arg(long)]
        query: Option<String>,

        /// Number of random candidate series to generate
        #[arg(long, requires = "length")]
        synthetic: Option<usize>,

        /// Length of each synthetic series (power of two)
        #[arg(long)]
        length: Option<usize>,

        /// Number of neighbours to keep
        #[arg(long)]
        k: usize,

        /// First depth evaluated (defaults to the series' level count)
        #[arg(long)]
        start_depth: Option<u32>,

        /// Sign-sum weighting: "dyadic" or "doubly-exponential"
        #[arg(long, default_value = "dyadic")]
        weighting: String,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct AlignOutput {
    query: i64,
    reference: i64,
    query_len: usize,
    reference_len: usize,
    cost: f64,
    path_len: usize,
    noise: Option<f64>,
}

#[derive(Serialize)]
struct SearchOutput {
    query: String,
    k: usize,
    candidates: usize,
    survivors: Vec<String>,
    rounds: usize,
    pruned: usize,
    final_depth: u32,
}

fn build_bandwidth(band: Option<usize>, band_fraction: Option<f64>) -> Result<Bandwidth> {
    match (band, band_fraction) {
        (Some(columns), None) => Ok(Bandwidth::Absolute(columns)),
        (None, Some(fraction)) => Ok(Bandwidth::Fraction(fraction)),
        _ => anyhow::bail!("exactly one of --band or --band-fraction is required"),
    }
}

fn parse_weighting(s: &str) -> Result<SignWeighting> {
    match s {
        "dyadic" => Ok(SignWeighting::Dyadic),
        "doubly-exponential" => Ok(SignWeighting::DoublyExponential),
        other => anyhow::bail!("unknown weighting: {other} (expected dyadic or doubly-exponential)"),
    }
}

fn writer_for(experiment: Option<String>, output_dir: &Path) -> Result<Option<ResultWriter>> {
    experiment
        .map(|name| -> Result<ResultWriter> {
            let name = ExperimentName::new(name)?;
            Ok(ResultWriter::new(output_dir, name)?)
        })
        .transpose()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);

    match cli.command {
        Command::Align {
            data,
            query,
            reference,
            band,
            band_fraction,
            noise,
            no_header,
            experiment,
            output_dir,
        } => {
            let bandwidth = build_bandwidth(band, band_fraction)?;
            let writer = writer_for(experiment, &output_dir)?;

            // 1. Read and group points
            let points = PointReader::new(&data)
                .with_headers(!no_header)
                .read()
                .context("failed to read point CSV")?;
            let trajectories = group_trajectories(points).context("failed to assemble trajectories")?;
            info!(n_trajectories = trajectories.len(), "trajectories loaded");

            let query_traj = find_trajectory(&trajectories, TrajectoryId::new(query))
                .with_context(|| format!("query trajectory {query} not found"))?;
            let reference_traj = find_trajectory(&trajectories, TrajectoryId::new(reference))
                .with_context(|| format!("reference trajectory {reference} not found"))?;

            // 2. Optionally perturb the reference
            let reference_traj = match noise {
                Some(sigma) => add_noise(reference_traj, sigma, &mut rng).context("noise injection failed")?,
                None => reference_traj.clone(),
            };

            // 3. Align
            let alignment = Dtw::new(bandwidth)
                .align(query_traj, &reference_traj)
                .context("alignment failed")?;

            // 4. Write JSON artifact
            if let Some(writer) = &writer {
                writer.write_alignment(&AlignmentSummary::new(query_traj, &reference_traj, &alignment))?;
            }

            // 5. Print summary
            let output = AlignOutput {
                query,
                reference,
                query_len: query_traj.len(),
                reference_len: reference_traj.len(),
                cost: alignment.cost,
                path_len: alignment.path.len(),
                noise,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Search {
            data,
            query,
            synthetic,
            length,
            k,
            start_depth,
            weighting,
            experiment,
            output_dir,
        } => {
            let weighting = parse_weighting(&weighting)?;
            let writer = writer_for(experiment, &output_dir)?;

            // 1. Gather raw series: query label, query samples, candidate labels and samples
            let (query_label, query_raw, labels, candidates_raw) = match (data, query, synthetic, length) {
                (Some(data), Some(query), None, _) => {
                    let dataset = SeriesReader::new(&data)
                        .read()
                        .context("failed to read series CSV")?;
                    let query_pos = dataset
                        .position(&query)
                        .with_context(|| format!("query series {query} not found"))?;

                    let mut labels = Vec::with_capacity(dataset.len().saturating_sub(1));
                    let mut series = Vec::with_capacity(dataset.len().saturating_sub(1));
                    for (i, (id, values)) in dataset.ids.iter().zip(&dataset.series).enumerate() {
                        if i != query_pos {
                            labels.push(id.as_str().to_string());
                            series.push(values.clone());
                        }
                    }
                    (query, dataset.series[query_pos].clone(), labels, series)
                }
                (None, None, Some(n), Some(len)) => {
                    let query_raw = random_series(&mut rng, len, SYNTHETIC_RANGE)?;
                    let series = (0..n)
                        .map(|_| random_series(&mut rng, len, SYNTHETIC_RANGE))
                        .collect::<Result<Vec<_>, _>>()?;
                    let labels = (0..n).map(|i| format!("s{i}")).collect();
                    ("query".to_string(), query_raw, labels, series)
                }
                _ => anyhow::bail!("use either --data with --query, or --synthetic with --length"),
            };
            info!(n_candidates = candidates_raw.len(), "series prepared");

            // 2. Decompose
            let query_haar = transform(&query_raw).context("query transform failed")?;
            let mut candidates = CandidateSet::from_series(
                candidates_raw
                    .iter()
                    .map(|s| transform(s))
                    .collect::<Result<Vec<_>, _>>()
                    .context("candidate transform failed")?,
            )
            .context("candidate lengths differ")?;

            // 3. Search
            let mut config = SearchConfig::new(k)?.with_weighting(weighting);
            if let Some(depth) = start_depth {
                config = config.with_start_depth(depth);
            }
            let result = config
                .search(&query_haar, &mut candidates)
                .context("search failed")?;

            // 4. Write JSON artifact
            let summary = SearchSummary::new(&query_label, k, &labels, &result);
            if let Some(writer) = &writer {
                writer.write_search(&summary)?;
            }

            // 5. Print summary
            let output = SearchOutput {
                query: query_label,
                k,
                candidates: labels.len(),
                survivors: summary.survivors.iter().map(|s| s.id.clone()).collect(),
                rounds: result.rounds.len(),
                pruned: result.pruned(),
                final_depth: result.final_depth,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
