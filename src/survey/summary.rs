//! Broadband residential summary.

use super::Survey;
use crate::acoustics;
use crate::constants::{DATE_OUTPUT_FORMAT, L90_PERCENTILE};
use crate::log::{Channel, Metric, TimeSeries};
use crate::period::{Period, PeriodTimes};
use crate::table::{ColumnKey, Table};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Native rows of a series grouped by survey date and period.
pub(super) fn rows_by_date_period(
    series: &TimeSeries,
    periods: &PeriodTimes,
) -> BTreeMap<(NaiveDate, Period), Vec<usize>> {
    let mut groups: BTreeMap<(NaiveDate, Period), Vec<usize>> = BTreeMap::new();
    for (row, ts) in series.timestamps().iter().enumerate() {
        let (period, date) = periods.tag(*ts);
        groups.entry((date, period)).or_default().push(row);
    }
    groups
}

/// Present values of `channel` at the given rows.
pub(super) fn values_at(series: &TimeSeries, channel: Channel, rows: &[usize]) -> Vec<f64> {
    series.column(channel).map_or_else(Vec::new, |col| {
        rows.iter().filter_map(|&r| col[r]).collect()
    })
}

impl Survey {
    /// Broadband summary per log, survey date and period.
    ///
    /// Columns: minutes covered, energy-averaged `Leq A`, maximum `Lmax A`
    /// and the 10th percentile of `L90 A`. Slices without observations are
    /// omitted.
    pub fn residential_summary(&self) -> Table {
        let columns = vec![
            ColumnKey::new(["Duration", "min"]),
            Channel::broadband(Metric::Leq).column_key(),
            Channel::broadband(Metric::Lmax).column_key(),
            Channel::broadband(Metric::L90).column_key(),
        ];
        let mut table = Table::new(["Log", "Date", "Period"], columns);

        for (name, log) in self.logs() {
            let series = log.series();
            let minutes_per_row = f64::from(series.interval().seconds()) / 60.0;

            for ((date, period), rows) in rows_by_date_period(series, &self.periods) {
                let leq = values_at(series, Channel::broadband(Metric::Leq), &rows);
                let lmax = values_at(series, Channel::broadband(Metric::Lmax), &rows);
                let l90 = values_at(series, Channel::broadband(Metric::L90), &rows);
                if leq.is_empty() && lmax.is_empty() && l90.is_empty() {
                    continue;
                }

                #[allow(clippy::cast_precision_loss)]
                let duration = rows.len() as f64 * minutes_per_row;
                table.push_row(
                    vec![
                        name.to_string(),
                        date.format(DATE_OUTPUT_FORMAT).to_string(),
                        period.label().to_string(),
                    ],
                    vec![
                        Some(duration),
                        acoustics::energy_average(&leq),
                        acoustics::maximum(&lmax),
                        acoustics::percentile(&l90, L90_PERCENTILE),
                    ],
                );
            }
        }

        if table.is_empty() {
            debug!("Residential summary has no rows");
        }
        table
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::log::Log;

    fn survey(csv: &str, periods: PeriodTimes) -> Survey {
        let mut survey = Survey::with_periods(periods);
        survey
            .add_log("site", Log::from_bytes(csv.as_bytes(), "site").unwrap())
            .unwrap();
        survey
    }

    #[test]
    fn test_night_after_midnight_joins_previous_date() {
        let csv = "Time,Leq A,Lmax A,L90 A\n\
2025-08-14 23:58,40,50,30\n\
2025-08-14 23:59,40,55,31\n\
2025-08-15 00:00,40,52,32\n\
2025-08-15 00:01,40,51,33\n";
        let periods = PeriodTimes::from_hm((7, 0), (19, 0), (23, 0)).unwrap();
        let table = survey(csv, periods).residential_summary();

        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.index, ["site", "2025-08-14", "Night-time"]);
        assert_eq!(row.values[0], Some(4.0));
        assert!((row.values[1].unwrap() - 40.0).abs() < 1e-9);
        assert_eq!(row.values[2], Some(55.0));
    }

    #[test]
    fn test_rows_split_at_anchor() {
        let csv = "Time,Leq A,Lmax A,L90 A\n\
2025-08-14 18:59,60,70,50\n\
2025-08-14 19:00,50,65,45\n";
        let periods = PeriodTimes::from_hm((7, 0), (19, 0), (23, 0)).unwrap();
        let table = survey(csv, periods).residential_summary();

        let periods: Vec<&str> = table.rows().iter().map(|r| r.index[2].as_str()).collect();
        assert_eq!(periods, ["Daytime", "Evening"]);
    }

    #[test]
    fn test_empty_survey_yields_empty_table() {
        assert!(Survey::new().residential_summary().is_empty());
    }
}
