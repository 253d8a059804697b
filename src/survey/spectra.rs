//! Combined Leq spectra and nth-highest Lmax spectra.

use super::Survey;
use crate::acoustics;
use crate::constants::{DATE_OUTPUT_FORMAT, TIME_OUTPUT_FORMAT};
use crate::error::{Error, Result};
use crate::log::{Channel, Interval, Metric};
use crate::period::PeriodSelector;
use crate::table::Table;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{debug, info};

impl Survey {
    /// Leq spectrum of the whole survey for each active period.
    ///
    /// Every band is the energy average over all logs and all rows that
    /// fall in the period, each row weighted by its log's native interval in
    /// seconds. Bands appear if at least one log carries them; a period with
    /// no observations has no row.
    pub fn leq_spectra(&self) -> Table {
        let channels = self.channels_of(Metric::Leq);
        let mut table = Table::new(["Period"], channels.iter().map(|c| c.column_key()).collect());

        for period in self.periods.active_periods() {
            let values: Vec<Option<f64>> = channels
                .iter()
                .map(|&channel| {
                    let samples = self.logs().flat_map(|(_, log)| {
                        let series = log.series();
                        let weight = f64::from(series.interval().seconds());
                        let column = series.column(channel).unwrap_or_default();
                        series
                            .timestamps()
                            .iter()
                            .zip(column)
                            .filter(move |(ts, _)| self.periods.classify(**ts) == period)
                            .filter_map(move |(_, v)| v.map(|level| (level, weight)))
                    });
                    acoustics::energy_average_weighted(samples)
                })
                .collect();

            if values.iter().any(Option::is_some) {
                table.push_row(vec![period.label().to_string()], values);
            }
        }
        table
    }

    /// The `n`th-highest broadband Lmax in every occurrence of a period,
    /// with the octave band levels recorded at that same timestamp.
    ///
    /// Each log is resampled to `resolution` first. Ranking is a stable
    /// descending sort, so equal levels keep timestamp order. Occurrences
    /// with fewer than `n` values produce no row. Selecting evenings while
    /// the evening period is disabled yields an empty table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `n` is zero or `resolution` is shorter
    /// than a log's native interval.
    pub fn lmax_spectra(
        &self,
        n: usize,
        resolution: Interval,
        selector: PeriodSelector,
    ) -> Result<Table> {
        if n < 1 {
            return Err(Error::invalid_parameter("n must be at least 1"));
        }

        let channels = self.channels_of(Metric::Lmax);
        let mut table = Table::new(
            ["Log", "Date", "Period", "Time"],
            channels.iter().map(|c| c.column_key()).collect(),
        );

        let period = selector.period();
        if !self.periods.is_active(period) {
            info!("Evening period is disabled; no Lmax spectra for {selector}");
            return Ok(table);
        }

        let broadband = Channel::broadband(Metric::Lmax);
        for (name, series) in self.resample_all(resolution)? {
            let Some(lmax) = series.column(broadband) else {
                continue;
            };

            let mut occurrences: BTreeMap<NaiveDateTime, Vec<(usize, f64)>> = BTreeMap::new();
            for (row, ts) in series.timestamps().iter().enumerate() {
                if self.periods.classify(*ts) != period {
                    continue;
                }
                if let Some(level) = lmax[row] {
                    occurrences
                        .entry(self.periods.window_start(*ts, period))
                        .or_default()
                        .push((row, level));
                }
            }

            for (start, mut ranked) in occurrences {
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
                let Some(&(row, _)) = ranked.get(n - 1) else {
                    debug!(
                        "{name}: {} occurrence starting {start} has only {} values",
                        period,
                        ranked.len()
                    );
                    continue;
                };
                let ts = series.timestamps()[row];
                table.push_row(
                    vec![
                        name.to_string(),
                        start.date().format(DATE_OUTPUT_FORMAT).to_string(),
                        period.label().to_string(),
                        ts.format(TIME_OUTPUT_FORMAT).to_string(),
                    ],
                    channels.iter().map(|&c| series.value(row, c)).collect(),
                );
            }
        }
        Ok(table)
    }
}
