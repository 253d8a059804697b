//! Minute-resolution time of day.

use crate::constants::MINUTES_PER_DAY;
use crate::error::{Error, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A time of day with minute resolution (`00:00`-`23:59`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u32,
}

impl ClockTime {
    /// Create a clock time from hour and minute.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(Error::InvalidClockTime {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Create a clock time, wrapping out-of-range components.
    pub(crate) const fn wrapping(hour: u32, minute: u32) -> Self {
        Self {
            minutes: (hour % 24) * 60 + minute % 60,
        }
    }

    /// Create a clock time from an `(hour, minute)` pair.
    pub fn from_hm((hour, minute): (u32, u32)) -> Result<Self> {
        Self::new(hour, minute)
    }

    /// Hour component.
    pub const fn hour(self) -> u32 {
        self.minutes / 60
    }

    /// Minute component.
    pub const fn minute(self) -> u32 {
        self.minutes % 60
    }

    /// Minutes elapsed since midnight.
    pub const fn minutes_from_midnight(self) -> u32 {
        self.minutes
    }

    /// Seconds elapsed since midnight.
    pub const fn seconds_from_midnight(self) -> u32 {
        self.minutes * 60
    }

    /// Minutes from `self` forward to `other`, wrapping at midnight.
    pub const fn minutes_until(self, other: Self) -> u32 {
        (other.minutes + MINUTES_PER_DAY - self.minutes) % MINUTES_PER_DAY
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            minutes: time.hour() * 60 + time.minute(),
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidClockTime {
            value: s.to_string(),
        };
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let t: ClockTime = "07:05".parse().unwrap();
        assert_eq!(t.hour(), 7);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "07:05");
        assert_eq!("7:00".parse::<ClockTime>().unwrap().to_string(), "07:00");
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("noon".parse::<ClockTime>().is_err());
        assert!(ClockTime::new(23, 59).is_ok());
    }

    #[test]
    fn test_minutes_until_wraps() {
        let night = ClockTime::new(23, 0).unwrap();
        let day = ClockTime::new(7, 0).unwrap();
        assert_eq!(night.minutes_until(day), 8 * 60);
        assert_eq!(day.minutes_until(night), 16 * 60);
        assert_eq!(day.minutes_until(day), 0);
    }

    #[test]
    fn test_from_naive_time_drops_seconds() {
        let t = NaiveTime::from_hms_opt(19, 30, 45).unwrap();
        assert_eq!(ClockTime::from(t), ClockTime::new(19, 30).unwrap());
    }
}
