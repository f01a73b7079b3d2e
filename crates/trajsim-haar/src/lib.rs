//! Haar wavelet decomposition with provable distance bounds and stepwise
//! k-nearest-candidate pruning.
//!
//! Pure math library, no I/O. Series lengths must be powers of two; every
//! distance is the squared Euclidean distance of the source samples.

mod bounds;
mod candidate;
mod config;
mod error;
mod level;
mod result;
mod search;
mod series;
mod synth;
mod transform;

pub use bounds::{
    Bounds, PairProfile, SignSums, SignWeighting, bounds, partial_distance, sign_sums,
    squared_euclidean, tree_distance, unread_energy,
};
pub use candidate::CandidateSet;
pub use config::SearchConfig;
pub use error::HaarError;
pub use level::{bottom_up_range, level_count, level_weight, top_down_range};
pub use result::{RoundSummary, SearchResult, Survivor};
pub use series::HaarSeries;
pub use synth::random_series;
pub use transform::{inverse, transform};
