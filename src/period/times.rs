//! Period anchors, classification and survey-date attribution.

use super::ClockTime;
use crate::constants::{SECONDS_PER_DAY, periods};
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the three regulatory time-of-day periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Period {
    /// Daytime, from the day anchor to the evening anchor.
    Day,
    /// Evening, from the evening anchor to the night anchor.
    Evening,
    /// Night-time, from the night anchor to the next day anchor.
    Night,
}

impl Period {
    /// All periods in chronological order within a day cycle.
    pub const ALL: [Self; 3] = [Self::Day, Self::Evening, Self::Night];

    /// Label used in output tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Daytime",
            Self::Evening => "Evening",
            Self::Night => "Night-time",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Plural period selector used by Lmax spectra (`days`, `evenings`, `nights`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodSelector {
    /// Every daytime occurrence.
    Days,
    /// Every evening occurrence.
    Evenings,
    /// Every night-time occurrence.
    Nights,
}

impl PeriodSelector {
    /// The period this selector picks.
    pub const fn period(self) -> Period {
        match self {
            Self::Days => Period::Day,
            Self::Evenings => Period::Evening,
            Self::Nights => Period::Night,
        }
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days => write!(f, "days"),
            Self::Evenings => write!(f, "evenings"),
            Self::Nights => write!(f, "nights"),
        }
    }
}

impl FromStr for PeriodSelector {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "days" | "day" | "daytime" => Ok(Self::Days),
            "evenings" | "evening" => Ok(Self::Evenings),
            "nights" | "night" | "night-time" => Ok(Self::Nights),
            other => Err(format!(
                "unknown period: {other} (expected days, evenings or nights)"
            )),
        }
    }
}

/// Validated day / evening / night anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTimes {
    day: ClockTime,
    evening: ClockTime,
    night: ClockTime,
}

impl Default for PeriodTimes {
    fn default() -> Self {
        let (dh, dm) = periods::DAY_START;
        let (eh, em) = periods::EVENING_START;
        let (nh, nm) = periods::NIGHT_START;
        Self {
            day: ClockTime::wrapping(dh, dm),
            evening: ClockTime::wrapping(eh, em),
            night: ClockTime::wrapping(nh, nm),
        }
    }
}

impl PeriodTimes {
    /// Build period anchors, rejecting configurations that do not partition
    /// the clock.
    ///
    /// The anchors must satisfy `day < evening <= night` on the clock, so
    /// night-time always runs over midnight. Evening may coincide with
    /// night, which disables the evening period.
    pub fn new(day: ClockTime, evening: ClockTime, night: ClockTime) -> Result<Self> {
        if day == evening {
            return Err(Error::InvalidPeriods {
                message: format!("day and evening both start at {day}"),
            });
        }
        if day == night {
            return Err(Error::InvalidPeriods {
                message: format!("day and night both start at {day}"),
            });
        }
        if day > evening || day > night {
            return Err(Error::InvalidPeriods {
                message: format!("night-time ({night} to {day}) must cross midnight"),
            });
        }
        if evening > night {
            return Err(Error::InvalidPeriods {
                message: format!(
                    "evening ({evening}) must start between day ({day}) and night ({night})"
                ),
            });
        }
        Ok(Self {
            day,
            evening,
            night,
        })
    }

    /// Build period anchors from `(hour, minute)` pairs.
    pub fn from_hm(day: (u32, u32), evening: (u32, u32), night: (u32, u32)) -> Result<Self> {
        Self::new(
            ClockTime::from_hm(day)?,
            ClockTime::from_hm(evening)?,
            ClockTime::from_hm(night)?,
        )
    }

    /// Daytime anchor.
    pub const fn day(&self) -> ClockTime {
        self.day
    }

    /// Evening anchor.
    pub const fn evening(&self) -> ClockTime {
        self.evening
    }

    /// Night-time anchor.
    pub const fn night(&self) -> ClockTime {
        self.night
    }

    /// Start anchor of a period.
    pub const fn start_of(&self, period: Period) -> ClockTime {
        match period {
            Period::Day => self.day,
            Period::Evening => self.evening,
            Period::Night => self.night,
        }
    }

    /// Whether the evening period has non-zero width.
    pub fn evening_enabled(&self) -> bool {
        self.evening != self.night
    }

    /// Periods that can hold observations, in day-cycle order.
    pub fn active_periods(&self) -> Vec<Period> {
        Period::ALL
            .into_iter()
            .filter(|p| *p != Period::Evening || self.evening_enabled())
            .collect()
    }

    /// Whether a period can hold observations.
    pub fn is_active(&self, period: Period) -> bool {
        period != Period::Evening || self.evening_enabled()
    }

    /// Classify a time of day given as seconds since midnight.
    ///
    /// Membership is half-open: an instant equal to an anchor belongs to the
    /// period that starts there.
    pub fn classify_seconds(&self, seconds_from_midnight: u32) -> Period {
        let offset = (seconds_from_midnight + SECONDS_PER_DAY
            - self.day.seconds_from_midnight())
            % SECONDS_PER_DAY;
        let evening_offset = self.day.minutes_until(self.evening) * 60;
        let night_offset = self.day.minutes_until(self.night) * 60;

        if offset < evening_offset {
            Period::Day
        } else if offset < night_offset {
            Period::Evening
        } else {
            Period::Night
        }
    }

    /// Classify a timestamp into its period.
    pub fn classify(&self, timestamp: NaiveDateTime) -> Period {
        self.classify_seconds(timestamp.time().num_seconds_from_midnight())
    }

    /// Instant at which the occurrence of `period` containing (or most
    /// recently preceding) `timestamp` began.
    pub fn window_start(&self, timestamp: NaiveDateTime, period: Period) -> NaiveDateTime {
        let now = timestamp.time().num_seconds_from_midnight();
        let start = self.start_of(period).seconds_from_midnight();
        let elapsed = (now + SECONDS_PER_DAY - start) % SECONDS_PER_DAY;
        timestamp - TimeDelta::seconds(i64::from(elapsed))
    }

    /// Calendar date on which the occurrence of `period` containing
    /// `timestamp` started.
    ///
    /// A 00:14 night-time reading is attributed to the previous day's night.
    pub fn survey_date(&self, timestamp: NaiveDateTime, period: Period) -> NaiveDate {
        self.window_start(timestamp, period).date()
    }

    /// Classify a timestamp and attribute it to its survey date.
    pub fn tag(&self, timestamp: NaiveDateTime) -> (Period, NaiveDate) {
        let period = self.classify(timestamp);
        (period, self.survey_date(timestamp, period))
    }
}

impl fmt::Display for PeriodTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day={}, evening={}, night={}",
            self.day, self.evening, self.night
        )?;
        if !self.evening_enabled() {
            write!(f, " (evening disabled)")?;
        }
        Ok(())
    }
}
