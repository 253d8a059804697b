//! Time-indexed multi-channel level series and resampling.

use super::{Channel, Interval};
use crate::constants::TIMESTAMP_OUTPUT_FORMAT;
use crate::error::{Error, Result};
use crate::table::Table;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use tracing::debug;

/// Readings at strictly increasing timestamps, stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    interval: Interval,
    timestamps: Vec<NaiveDateTime>,
    channels: Vec<Channel>,
    columns: Vec<Vec<Option<f64>>>,
}

impl TimeSeries {
    /// Assemble a series from parts.
    ///
    /// `timestamps` must be strictly increasing and every column must have
    /// one entry per timestamp.
    pub fn new(
        interval: Interval,
        timestamps: Vec<NaiveDateTime>,
        channels: Vec<Channel>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        if channels.len() != columns.len() {
            return Err(Error::invalid_parameter(format!(
                "{} channels but {} columns",
                channels.len(),
                columns.len()
            )));
        }
        if let Some(bad) = columns.iter().position(|c| c.len() != timestamps.len()) {
            return Err(Error::invalid_parameter(format!(
                "column '{}' has {} values for {} timestamps",
                channels[bad],
                columns[bad].len(),
                timestamps.len()
            )));
        }
        if let Some(w) = timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::invalid_parameter(format!(
                "timestamps not strictly increasing at {}",
                w[1]
            )));
        }
        Ok(Self {
            interval,
            timestamps,
            channels,
            columns,
        })
    }

    /// Sampling interval of the series.
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Row timestamps.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Channels in column order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Whether the series carries `channel`.
    pub fn has_channel(&self, channel: Channel) -> bool {
        self.channels.contains(&channel)
    }

    /// All values of a channel.
    pub fn column(&self, channel: Channel) -> Option<&[Option<f64>]> {
        self.channels
            .iter()
            .position(|c| *c == channel)
            .map(|i| self.columns[i].as_slice())
    }

    /// Value of a channel at a row.
    pub fn value(&self, row: usize, channel: Channel) -> Option<f64> {
        self.column(channel).and_then(|col| col.get(row).copied().flatten())
    }

    /// First timestamp.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.timestamps.first().copied()
    }

    /// Last timestamp.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }

    /// Resample onto a coarser grid.
    ///
    /// Bins are aligned to midnight of the first day and labelled by their
    /// left edge. Each channel is combined with its metric's rule; bins
    /// without observations are skipped. Resampling to the current interval
    /// leaves an aligned series unchanged.
    pub fn resample(&self, interval: Interval) -> Result<Self> {
        if interval < self.interval {
            return Err(Error::invalid_parameter(format!(
                "resampling interval {interval} is shorter than the native interval {}",
                self.interval
            )));
        }

        let Some(first) = self.start() else {
            return Ok(Self {
                interval,
                timestamps: Vec::new(),
                channels: self.channels.clone(),
                columns: vec![Vec::new(); self.channels.len()],
            });
        };

        let origin = first.date().and_time(NaiveTime::MIN);
        let step = i64::from(interval.seconds());
        let bin_of = |ts: NaiveDateTime| (ts - origin).num_seconds().div_euclid(step);

        let mut timestamps = Vec::new();
        let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); self.channels.len()];
        let mut scratch = Vec::new();

        let mut start = 0;
        while start < self.timestamps.len() {
            let bin = bin_of(self.timestamps[start]);
            let mut end = start + 1;
            while end < self.timestamps.len() && bin_of(self.timestamps[end]) == bin {
                end += 1;
            }

            timestamps.push(origin + TimeDelta::seconds(bin * step));
            for (col, (channel, values)) in self.channels.iter().zip(&self.columns).enumerate() {
                scratch.clear();
                scratch.extend(values[start..end].iter().flatten());
                columns[col].push(channel.metric.combine(&scratch));
            }
            start = end;
        }

        debug!(
            "Resampled {} rows at {} to {} rows at {}",
            self.len(),
            self.interval,
            timestamps.len(),
            interval
        );

        Ok(Self {
            interval,
            timestamps,
            channels: self.channels.clone(),
            columns,
        })
    }

    /// Render as a table indexed by `Timestamp` and `Log`.
    pub fn to_table(&self, log_name: &str) -> Table {
        let columns = self.channels.iter().map(|c| c.column_key()).collect();
        let mut table = Table::new(["Timestamp", "Log"], columns);
        for (row, ts) in self.timestamps.iter().enumerate() {
            table.push_row(
                vec![
                    ts.format(TIMESTAMP_OUTPUT_FORMAT).to_string(),
                    log_name.to_string(),
                ],
                self.columns.iter().map(|col| col[row]).collect(),
            );
        }
        table
    }
}
