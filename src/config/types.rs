//! Configuration type definitions.

use crate::constants::defaults;
use crate::error::{Error, Result};
use crate::export::{CsvOptions, HeaderMode};
use crate::log::{Channel, Interval, Metric};
use crate::period::{ClockTime, PeriodSelector, PeriodTimes};
use crate::survey::PeriodIntervals;
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Survey period anchors.
    pub periods: PeriodsConfig,

    /// Default analysis settings.
    pub defaults: DefaultsConfig,

    /// Export settings.
    pub export: ExportConfig,
}

impl Config {
    /// Validated period anchors.
    pub fn period_times(&self) -> Result<PeriodTimes> {
        PeriodTimes::new(self.periods.day, self.periods.evening, self.periods.night)
    }
}

/// Day / evening / night start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodsConfig {
    /// Start of the daytime period.
    pub day: ClockTime,
    /// Start of the evening period; equal to `night` disables evenings.
    pub evening: ClockTime,
    /// Start of the night-time period.
    pub night: ClockTime,
}

impl Default for PeriodsConfig {
    fn default() -> Self {
        let times = PeriodTimes::default();
        Self {
            day: times.day(),
            evening: times.evening(),
            night: times.night(),
        }
    }
}

/// Default analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Resampling interval for time histories and workbook export.
    pub resample: String,

    /// Rank for the nth-highest Lmax.
    pub lmax_n: usize,

    /// Time resolution for Lmax ranking.
    pub lmax_resolution: String,

    /// Period for Lmax spectra (`days`, `evenings` or `nights`).
    pub lmax_period: String,

    /// Metric for modal values and counts (`L90`, `Leq` or `Lmax`, broadband).
    pub modal_metric: String,

    /// Daytime resolution for modal values and counts.
    pub modal_day: String,

    /// Evening resolution for modal values and counts.
    pub modal_evening: String,

    /// Night-time resolution for modal values and counts.
    pub modal_night: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            resample: defaults::RESAMPLE.to_string(),
            lmax_n: defaults::LMAX_N,
            lmax_resolution: defaults::LMAX_RESOLUTION.to_string(),
            lmax_period: defaults::LMAX_PERIOD.to_string(),
            modal_metric: defaults::MODAL_METRIC.to_string(),
            modal_day: defaults::MODAL_DAY.to_string(),
            modal_evening: defaults::MODAL_EVENING.to_string(),
            modal_night: defaults::MODAL_NIGHT.to_string(),
        }
    }
}

fn interval_setting(key: &str, value: &str) -> Result<Interval> {
    value.parse().map_err(|_| Error::ConfigValidation {
        message: format!("{key} is not a valid interval: '{value}'"),
    })
}

impl DefaultsConfig {
    /// Parsed resampling interval.
    pub fn resample_interval(&self) -> Result<Interval> {
        interval_setting("resample", &self.resample)
    }

    /// Parsed Lmax resolution.
    pub fn lmax_interval(&self) -> Result<Interval> {
        interval_setting("lmax_resolution", &self.lmax_resolution)
    }

    /// Parsed Lmax period selector.
    pub fn lmax_selector(&self) -> Result<PeriodSelector> {
        self.lmax_period
            .parse()
            .map_err(|message| Error::ConfigValidation { message })
    }

    /// Broadband channel of the configured modal metric.
    pub fn modal_channel(&self) -> Result<Channel> {
        self.modal_metric
            .parse::<Metric>()
            .map(Channel::broadband)
            .map_err(|message| Error::ConfigValidation { message })
    }

    /// Parsed per-period modal resolutions.
    pub fn modal_intervals(&self) -> Result<PeriodIntervals> {
        Ok(PeriodIntervals::new(
            interval_setting("modal_day", &self.modal_day)?,
            interval_setting("modal_evening", &self.modal_evening)?,
            interval_setting("modal_night", &self.modal_night)?,
        ))
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write a UTF-8 BOM at the start of CSV files.
    pub csv_bom: bool,

    /// CSV header layout.
    pub header: HeaderMode,

    /// Fixed number of decimals in CSV output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<usize>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_bom: true,
            header: HeaderMode::Flat,
            decimals: None,
        }
    }
}

impl ExportConfig {
    /// CSV writer options.
    pub const fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            bom: self.csv_bom,
            header: self.header,
            decimals: self.decimals,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_periods_disable_evening() {
        let config = Config::default();
        let times = config.period_times().unwrap();
        assert_eq!(times.day().to_string(), "07:00");
        assert!(!times.evening_enabled());
    }

    #[test]
    fn test_defaults_parse() {
        let defaults = DefaultsConfig::default();
        assert_eq!(defaults.resample_interval().unwrap().seconds(), 900);
        assert_eq!(defaults.lmax_interval().unwrap().seconds(), 120);
        assert_eq!(defaults.lmax_selector().unwrap(), PeriodSelector::Nights);
        assert_eq!(defaults.modal_channel().unwrap(), Channel::broadband(Metric::L90));
        let intervals = defaults.modal_intervals().unwrap();
        assert_eq!(intervals.night.seconds(), 900);
        assert_eq!(intervals.day.seconds(), 3600);
    }

    #[test]
    fn test_bad_interval_is_validation_error() {
        let defaults = DefaultsConfig {
            modal_night: "soon".to_string(),
            ..DefaultsConfig::default()
        };
        assert!(matches!(
            defaults.modal_intervals(),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.periods.evening = "19:00".parse().unwrap();
        config.export.header = HeaderMode::MultiRow;
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("evening = \"19:00\""));
        assert!(text.contains("header = \"multi\""));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.periods, config.periods);
        assert_eq!(back.export, config.export);
    }
}
