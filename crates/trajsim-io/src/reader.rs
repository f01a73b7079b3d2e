//! CSV numeric series reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{SeriesDataset, SeriesId};

/// Reads named numeric series from a CSV file.
///
/// Expected CSV format:
/// - Header row required (first column is the series id, remaining are positional samples)
/// - `series_id,v0,v1,...,vn`
/// - One row per series, all rows must have the same number of columns
///
/// Lengths are not checked against a power of two here; the Haar transform
/// rejects them when the dataset is decomposed.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidNumber`] | Cell is NaN, Inf, or unparseable float |
/// | [`IoError::DuplicateSeriesId`] | Same series id appears twice |
pub struct SeriesReader {
    path: PathBuf,
}

impl SeriesReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`SeriesDataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<SeriesDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets the InconsistentRowLength check below fire
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let mut ids = Vec::new();
        let mut series = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            let series_id = record.get(0).unwrap_or("").to_string();

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    series_id,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            if let Some(&first_row) = seen.get(&series_id) {
                return Err(IoError::DuplicateSeriesId {
                    path: self.path.clone(),
                    series_id,
                    first_row,
                    second_row: row_index,
                });
            }
            seen.insert(series_id.clone(), row_index);

            let mut values = Vec::with_capacity(expected_cols.saturating_sub(1));
            for (col_index, raw) in record.iter().enumerate().skip(1) {
                match raw.parse::<f64>() {
                    Ok(v) if v.is_finite() => values.push(v),
                    _ => {
                        return Err(IoError::InvalidNumber {
                            path: self.path.clone(),
                            row_index,
                            col_index: col_index - 1,
                            raw: raw.to_string(),
                        });
                    }
                }
            }

            ids.push(SeriesId::new(series_id));
            series.push(values);
        }

        if ids.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_series = ids.len(),
            n_samples = series.first().map_or(0, Vec::len),
            "dataset loaded"
        );

        Ok(SeriesDataset { ids, series })
    }
}
