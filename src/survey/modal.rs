//! Modal values and value-count distributions.

use super::{Survey, resample_named};
use crate::acoustics;
use crate::constants::DATE_OUTPUT_FORMAT;
use crate::error::{Error, Result};
use crate::log::{Channel, Interval};
use crate::period::Period;
use crate::table::{ColumnKey, Table};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Resampling resolution for each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodIntervals {
    /// Daytime resolution.
    pub day: Interval,
    /// Evening resolution.
    pub evening: Interval,
    /// Night-time resolution.
    pub night: Interval,
}

impl PeriodIntervals {
    /// Create per-period resolutions.
    pub const fn new(day: Interval, evening: Interval, night: Interval) -> Self {
        Self {
            day,
            evening,
            night,
        }
    }

    /// Same resolution for every period.
    pub const fn uniform(interval: Interval) -> Self {
        Self::new(interval, interval, interval)
    }

    /// Resolution used for `period`.
    pub const fn get(&self, period: Period) -> Interval {
        match period {
            Period::Day => self.day,
            Period::Evening => self.evening,
            Period::Night => self.night,
        }
    }
}

impl Survey {
    /// Most frequent whole-decibel value of `channel` per period.
    ///
    /// Each period is resampled at its own resolution and the values of all
    /// logs are pooled. With `by_date` there is one row per survey date and
    /// period, otherwise one row per period. Ties pick the lowest level.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if no log carries `channel` or a
    /// resolution is shorter than a log's native interval.
    pub fn modal(&self, channel: Channel, by_date: bool, intervals: &PeriodIntervals) -> Result<Table> {
        self.require_channel(channel)?;

        let mut pooled: BTreeMap<(Option<NaiveDate>, Period), Vec<f64>> = BTreeMap::new();
        for (name, log) in self.logs() {
            if !log.series().has_channel(channel) {
                continue;
            }
            for period in self.periods.active_periods() {
                let series = resample_named(name, log, intervals.get(period))?;
                let Some(column) = series.column(channel) else {
                    continue;
                };
                for (ts, value) in series.timestamps().iter().zip(column) {
                    let Some(level) = value else { continue };
                    if self.periods.classify(*ts) != period {
                        continue;
                    }
                    let date = by_date.then(|| self.periods.survey_date(*ts, period));
                    pooled.entry((date, period)).or_default().push(*level);
                }
            }
        }

        let index: &[&str] = if by_date { &["Date", "Period"] } else { &["Period"] };
        let mut table = Table::new(index.iter().copied(), vec![channel.column_key()]);
        for ((date, period), levels) in pooled {
            let Some(mode) = acoustics::modal_level(&levels) else {
                continue;
            };
            let mut labels = Vec::with_capacity(2);
            if let Some(date) = date {
                labels.push(date.format(DATE_OUTPUT_FORMAT).to_string());
            }
            labels.push(period.label().to_string());
            #[allow(clippy::cast_precision_loss)]
            table.push_row(labels, vec![Some(mode as f64)]);
        }
        Ok(table)
    }

    /// Frequency of each whole-decibel value of `channel` per log and period.
    ///
    /// Uses the same per-period resampling as [`Survey::modal`]. Rows are
    /// ordered by log, period, then ascending level.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if no log carries `channel` or a
    /// resolution is shorter than a log's native interval.
    pub fn counts(&self, channel: Channel, intervals: &PeriodIntervals) -> Result<Table> {
        self.require_channel(channel)?;

        let mut table = Table::new(["Log", "Period", "dB"], vec![ColumnKey::single("Count")]);
        for (name, log) in self.logs() {
            if !log.series().has_channel(channel) {
                debug!("Log '{name}' has no {channel} column; skipped in counts");
                continue;
            }
            for period in self.periods.active_periods() {
                let series = resample_named(name, log, intervals.get(period))?;
                let levels: Vec<f64> = series
                    .timestamps()
                    .iter()
                    .zip(series.column(channel).unwrap_or_default())
                    .filter(|(ts, _)| self.periods.classify(**ts) == period)
                    .filter_map(|(_, v)| *v)
                    .collect();

                for (level, count) in acoustics::value_counts(&levels) {
                    #[allow(clippy::cast_precision_loss)]
                    table.push_row(
                        vec![name.to_string(), period.label().to_string(), level.to_string()],
                        vec![Some(count as f64)],
                    );
                }
            }
        }
        Ok(table)
    }

    fn require_channel(&self, channel: Channel) -> Result<()> {
        if self.logs().any(|(_, log)| log.series().has_channel(channel)) || self.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_parameter(format!(
                "no log in the survey has a '{channel}' column"
            )))
        }
    }
}
