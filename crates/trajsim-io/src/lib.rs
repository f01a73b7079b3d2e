//! File I/O, validation, and serialization for the trajsim pipeline.

mod domain;
mod error;
mod group;
mod point_reader;
mod reader;
mod writer;

pub use domain::{ExperimentName, SeriesDataset, SeriesId};
pub use error::IoError;
pub use group::{find_trajectory, group_trajectories};
pub use point_reader::{ColumnLayout, PointReader};
pub use reader::SeriesReader;
pub use writer::{AlignmentSummary, ResultWriter, RoundEntry, SearchSummary, SurvivorEntry};
