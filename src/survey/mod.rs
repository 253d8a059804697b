//! Surveys: named logs analysed under one period configuration.
//!
//! A [`Survey`] keeps its logs in insertion order and owns the active
//! [`PeriodTimes`]. Aggregations never mutate the survey, so repeated calls
//! on unchanged inputs produce identical tables. Changing the periods only
//! affects period-partitioned results; the parsed logs are untouched.

mod modal;
mod naming;
mod spectra;
mod summary;

pub use modal::PeriodIntervals;
pub use naming::unique_name;

use crate::error::{Error, Result};
use crate::log::{Channel, Interval, Log, Metric, TimeSeries};
use crate::period::PeriodTimes;
use crate::table::Table;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// An ordered collection of uniquely named logs plus the active periods.
///
/// Logs are reference counted so subsets share parsed data.
#[derive(Debug, Clone, Default)]
pub struct Survey {
    logs: Vec<(String, Arc<Log>)>,
    periods: PeriodTimes,
}

impl Survey {
    /// Create an empty survey with the default periods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty survey with the given periods.
    pub const fn with_periods(periods: PeriodTimes) -> Self {
        Self {
            logs: Vec::new(),
            periods,
        }
    }

    /// Add a log under `name`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyLogName`] for a blank name and
    /// [`Error::DuplicateLogName`] if the name is taken.
    pub fn add_log(&mut self, name: impl Into<String>, log: Log) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyLogName);
        }
        if self.contains(&name) {
            return Err(Error::DuplicateLogName { name });
        }
        debug!("Adding log '{name}' ({} rows)", log.series().len());
        self.logs.push((name, Arc::new(log)));
        Ok(())
    }

    /// Add a log under `desired`, or under `desired-1`, `desired-2`, ... if
    /// that name is taken. Returns the name actually used.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyLogName`] for a blank name.
    pub fn attach_log(&mut self, desired: &str, log: Log) -> Result<String> {
        let name = unique_name(desired, self.names());
        self.add_log(name.clone(), log)?;
        Ok(name)
    }

    /// Remove and return a log.
    ///
    /// # Errors
    ///
    /// [`Error::LogNotFound`] if no log has this name.
    pub fn remove_log(&mut self, name: &str) -> Result<Arc<Log>> {
        let pos = self
            .logs
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| Error::LogNotFound {
                name: name.to_string(),
            })?;
        Ok(self.logs.remove(pos).1)
    }

    /// A survey holding only the named logs, in this survey's order, with
    /// the same periods.
    ///
    /// # Errors
    ///
    /// [`Error::LogNotFound`] for an unknown name.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if let Some(unknown) = names.iter().find(|n| !self.contains(n.as_ref())) {
            return Err(Error::LogNotFound {
                name: unknown.as_ref().to_string(),
            });
        }
        let logs = self
            .logs
            .iter()
            .filter(|(n, _)| names.iter().any(|want| want.as_ref() == n))
            .cloned()
            .collect();
        Ok(Self {
            logs,
            periods: self.periods,
        })
    }

    /// Replace the period configuration.
    pub fn set_periods(&mut self, periods: PeriodTimes) {
        debug!("Survey periods set to {periods}");
        self.periods = periods;
    }

    /// Active period configuration.
    pub const fn periods(&self) -> &PeriodTimes {
        &self.periods
    }

    /// Log names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.logs.iter().map(|(n, _)| n.as_str())
    }

    /// Whether a log with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.logs.iter().any(|(n, _)| n == name)
    }

    /// Look up a log.
    ///
    /// # Errors
    ///
    /// [`Error::LogNotFound`] if no log has this name.
    pub fn log(&self, name: &str) -> Result<&Log> {
        self.logs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, log)| log.as_ref())
            .ok_or_else(|| Error::LogNotFound {
                name: name.to_string(),
            })
    }

    /// Named logs in insertion order.
    pub fn logs(&self) -> impl Iterator<Item = (&str, &Log)> {
        self.logs.iter().map(|(n, log)| (n.as_str(), log.as_ref()))
    }

    /// Number of logs.
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// Whether the survey has no logs.
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Time history of one log resampled to `interval`, indexed by
    /// `Timestamp` and `Log`.
    ///
    /// # Errors
    ///
    /// [`Error::LogNotFound`] for an unknown name, [`Error::InvalidParameter`]
    /// if `interval` is shorter than the log's native interval.
    pub fn resampled_table(&self, name: &str, interval: Interval) -> Result<Table> {
        Ok(self.log(name)?.as_interval(interval)?.to_table(name))
    }

    /// Every channel of `metric` carried by at least one log, in column order.
    fn channels_of(&self, metric: Metric) -> Vec<Channel> {
        self.logs
            .iter()
            .flat_map(|(_, log)| log.series().channels().iter().copied())
            .filter(|c| c.metric == metric)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resample every log to `interval`, keeping names.
    fn resample_all(&self, interval: Interval) -> Result<Vec<(&str, TimeSeries)>> {
        self.logs
            .iter()
            .map(|(name, log)| Ok((name.as_str(), resample_named(name, log, interval)?)))
            .collect()
    }
}

/// Resample one log, naming it in a resolution error.
fn resample_named(name: &str, log: &Log, interval: Interval) -> Result<TimeSeries> {
    log.as_interval(interval).map_err(|e| match e {
        Error::InvalidParameter { message } => Error::InvalidParameter {
            message: format!("log '{name}': {message}"),
        },
        other => other,
    })
}
