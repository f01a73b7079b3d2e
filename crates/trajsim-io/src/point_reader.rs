//! CSV reader for timestamped GPS points.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

use trajsim_dtw::{Point, TrajectoryId};

use crate::IoError;

/// Zero-based column positions of the point fields within a CSV row.
///
/// The default layout skips column 0 (a row number) and reads
/// `latitude, longitude, trajectory_id, timestamp` from columns 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Column holding the latitude in degrees.
    pub latitude: usize,
    /// Column holding the longitude in degrees.
    pub longitude: usize,
    /// Column holding the integer trajectory identifier.
    pub trajectory_id: usize,
    /// Column holding the timestamp.
    pub timestamp: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            latitude: 1,
            longitude: 2,
            trajectory_id: 3,
            timestamp: 4,
        }
    }
}

impl ColumnLayout {
    fn max_column(&self) -> usize {
        self.latitude
            .max(self.longitude)
            .max(self.trajectory_id)
            .max(self.timestamp)
    }
}

/// Reads GPS points from a CSV file.
///
/// Rows may carry extra columns; only the ones named by the [`ColumnLayout`]
/// are read. Timestamps are parsed as naive local times.
///
/// # Defaults
///
/// | Parameter          | Default               |
/// |--------------------|-----------------------|
/// | `has_headers`      | true                  |
/// | `layout`           | columns 1, 2, 3, 4    |
/// | `timestamp_format` | `%Y-%m-%d %H:%M:%S`   |
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows |
/// | [`IoError::MissingColumn`] | Row is too short for the layout |
/// | [`IoError::InvalidNumber`] | Coordinate or id is unparseable or non-finite |
/// | [`IoError::InvalidTimestamp`] | Timestamp does not match the format |
#[derive(Debug, Clone)]
pub struct PointReader {
    path: PathBuf,
    has_headers: bool,
    layout: ColumnLayout,
    timestamp_format: String,
}

impl PointReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            has_headers: true,
            layout: ColumnLayout::default(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }

    /// Set whether the first row is a header to skip.
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Set the column positions of the point fields.
    #[must_use]
    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the `chrono` format string used to parse timestamps.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Read every row as a [`Point`], in file order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<Point>, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let needed = self.layout.max_column() + 1;
        let mut points = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            if record.len() < needed {
                return Err(IoError::MissingColumn {
                    path: self.path.clone(),
                    row_index,
                    column: record.len(),
                    got: record.len(),
                });
            }

            let latitude = self.number(&record, row_index, self.layout.latitude)?;
            let longitude = self.number(&record, row_index, self.layout.longitude)?;

            let raw_id = &record[self.layout.trajectory_id];
            let id: i64 = raw_id.parse().map_err(|_| IoError::InvalidNumber {
                path: self.path.clone(),
                row_index,
                col_index: self.layout.trajectory_id,
                raw: raw_id.to_string(),
            })?;

            let raw_ts = &record[self.layout.timestamp];
            let timestamp = NaiveDateTime::parse_from_str(raw_ts, &self.timestamp_format)
                .map_err(|e| IoError::InvalidTimestamp {
                    path: self.path.clone(),
                    row_index,
                    raw: raw_ts.to_string(),
                    source: e,
                })?;

            points.push(Point::new(timestamp, latitude, longitude, TrajectoryId::new(id)));
        }

        if points.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        debug!(format = %self.timestamp_format, "timestamps parsed");
        info!(n_points = points.len(), "points loaded");
        Ok(points)
    }

    fn number(&self, record: &csv::StringRecord, row_index: usize, col_index: usize) -> Result<f64, IoError> {
        let raw = &record[col_index];
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(IoError::InvalidNumber {
                path: self.path.clone(),
                row_index,
                col_index,
                raw: raw.to_string(),
            }),
        }
    }
}
