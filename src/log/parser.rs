//! Sound level meter CSV parsing.
//!
//! Expects a header row with a `Time` column and metric columns named
//! `<Metric> <Band>` (`Leq A`, `Lmax 125`, `L90 8000`, ...). Uses the
//! `csv` crate, so quoted fields and a UTF-8 BOM are handled.

use super::{Channel, Interval, TimeSeries};
use crate::constants::{TIME_COLUMN_NAMES, TIMESTAMP_FORMATS};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::io::Read;
use tracing::debug;

/// Parse a timestamp in any of the accepted formats.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Parse a log from CSV text.
///
/// `name` only labels error messages.
///
/// # Errors
///
/// - [`Error::LogParse`] if the timestamp column is missing, a timestamp or
///   value cannot be parsed, two rows share a timestamp, or there are fewer
///   than two rows.
/// - [`Error::MissingChannels`] if `Leq A`, `Lmax A` or `L90 A` is absent.
///   Octave bands are optional.
pub fn parse_series<R: Read>(reader: R, name: &str) -> Result<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| Error::log_parse(name, format!("cannot read header row: {e}")))?
        .clone();

    let time_col = headers
        .iter()
        .position(|h| TIME_COLUMN_NAMES.contains(&h.to_lowercase().as_str()))
        .ok_or_else(|| Error::log_parse(name, "missing timestamp column 'Time'"))?;

    let mut mapped: Vec<(usize, Channel)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if idx == time_col {
            continue;
        }
        match header.parse::<Channel>() {
            Ok(channel) => {
                if mapped.iter().any(|(_, c)| *c == channel) {
                    return Err(Error::log_parse(
                        name,
                        format!("duplicate column '{channel}'"),
                    ));
                }
                mapped.push((idx, channel));
            }
            Err(_) => debug!("Ignoring column '{header}' in {name}"),
        }
    }

    let missing: Vec<String> = Channel::REQUIRED
        .iter()
        .filter(|req| !mapped.iter().any(|(_, c)| c == *req))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingChannels {
            name: name.to_string(),
            missing,
        });
    }

    // Canonical column order: metric, then broadband before octave bands.
    mapped.sort_by_key(|(_, c)| *c);

    let mut rows: Vec<(NaiveDateTime, Vec<Option<f64>>)> = Vec::new();
    for (line_idx, result) in reader.records().enumerate() {
        let line = line_idx + 2;
        let record =
            result.map_err(|e| Error::log_parse(name, format!("line {line}: {e}")))?;

        let raw_time = record.get(time_col).unwrap_or_default();
        if raw_time.is_empty() && record.iter().all(str::is_empty) {
            continue;
        }
        let timestamp = parse_timestamp(raw_time).ok_or_else(|| {
            Error::log_parse(name, format!("line {line}: invalid timestamp '{raw_time}'"))
        })?;

        let mut values = Vec::with_capacity(mapped.len());
        for (idx, channel) in &mapped {
            let cell = record.get(*idx).unwrap_or_default();
            values.push(parse_level(cell).map_err(|()| {
                Error::log_parse(
                    name,
                    format!("line {line}: invalid value '{cell}' in column '{channel}'"),
                )
            })?);
        }
        rows.push((timestamp, values));
    }

    rows.sort_by_key(|(ts, _)| *ts);
    if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(Error::log_parse(
            name,
            format!("duplicate timestamp {}", pair[0].0),
        ));
    }
    if rows.len() < 2 {
        return Err(Error::log_parse(
            name,
            "at least two observations are needed to determine the sampling interval",
        ));
    }

    let timestamps: Vec<NaiveDateTime> = rows.iter().map(|(ts, _)| *ts).collect();
    let interval = native_interval(&timestamps)
        .ok_or_else(|| Error::log_parse(name, "cannot determine sampling interval"))?;

    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(rows.len()); mapped.len()];
    for (_, values) in rows {
        for (col, value) in values.into_iter().enumerate() {
            columns[col].push(value);
        }
    }
    let channels = mapped.into_iter().map(|(_, c)| c).collect();

    TimeSeries::new(interval, timestamps, channels, columns)
}

/// Parse one level cell: empty or NaN is missing, anything else must be numeric.
fn parse_level(cell: &str) -> std::result::Result<Option<f64>, ()> {
    if cell.is_empty() || cell == "-" {
        return Ok(None);
    }
    let value: f64 = cell.parse().map_err(|_| ())?;
    if value.is_nan() {
        Ok(None)
    } else if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(())
    }
}

/// Median spacing between consecutive timestamps.
fn native_interval(timestamps: &[NaiveDateTime]) -> Option<Interval> {
    let mut gaps: Vec<i64> = timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds())
        .filter(|&s| s > 0)
        .collect();
    if gaps.is_empty() {
        return None;
    }
    gaps.sort_unstable();
    let median = gaps[(gaps.len() - 1) / 2];
    Interval::from_seconds(u32::try_from(median).ok()?).ok()
}
