//! A parsed sound level meter log.

use super::{Interval, TimeSeries, parse_series};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// One measurement log at its native sampling interval.
///
/// Logs are immutable once parsed; resampled views are produced on demand
/// by [`Log::as_interval`] and the native series is kept for reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    source: Option<PathBuf>,
    series: TimeSeries,
}

impl Log {
    /// Parse a log from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| Error::LogRead {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        })?;
        let label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let series = parse_series(file, &label)?;
        info!(
            "Loaded {}: {} rows, {} channels, every {}",
            path.display(),
            series.len(),
            series.channels().len(),
            series.interval()
        );
        Ok(Self {
            source: Some(path.to_path_buf()),
            series,
        })
    }

    /// Parse a log from any CSV reader; `label` appears in error messages.
    pub fn from_reader<R: Read>(reader: R, label: &str) -> Result<Self> {
        Ok(Self {
            source: None,
            series: parse_series(reader, label)?,
        })
    }

    /// Parse a log from raw CSV bytes (e.g. an upload).
    pub fn from_bytes(bytes: &[u8], label: &str) -> Result<Self> {
        Self::from_reader(bytes, label)
    }

    /// Wrap an already assembled series.
    pub const fn from_series(series: TimeSeries) -> Self {
        Self {
            source: None,
            series,
        }
    }

    /// File the log was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Native series.
    pub const fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Native sampling interval.
    pub const fn interval(&self) -> Interval {
        self.series.interval()
    }

    /// First timestamp.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.series.start()
    }

    /// Last timestamp.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.series.end()
    }

    /// Resample to `interval`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `interval` is shorter than the native
    /// interval.
    pub fn as_interval(&self, interval: Interval) -> Result<TimeSeries> {
        self.series.resample(interval)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::log::{Channel, Metric};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "Time,Leq A,Lmax A,L90 A\n\
2025/08/14 00:00,50,60,40\n\
2025/08/14 00:01,50,62,41\n\
2025/08/14 00:02,50,61,42\n";

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        file.flush().unwrap();

        let log = Log::from_path(file.path()).unwrap();
        assert_eq!(log.series().len(), 3);
        assert_eq!(log.source(), Some(file.path()));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Log::from_path(Path::new("/nonexistent/log.csv"));
        assert!(matches!(result, Err(Error::LogRead { .. })));
    }

    #[test]
    fn test_as_interval_keeps_native_series() {
        let log = Log::from_bytes(CSV.as_bytes(), "inline").unwrap();
        let coarse = log.as_interval(Interval::from_minutes(5).unwrap()).unwrap();
        assert_eq!(coarse.len(), 1);
        assert_eq!(coarse.value(0, Channel::broadband(Metric::Lmax)), Some(62.0));
        assert_eq!(log.series().len(), 3);
        assert!(log.as_interval(Interval::from_seconds(10).unwrap()).is_err());
    }
}
