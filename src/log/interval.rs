//! Resampling intervals such as `15min` or `1h`.

use crate::error::{Error, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A positive whole number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    seconds: u32,
}

impl Interval {
    /// Create an interval from seconds.
    pub fn from_seconds(seconds: u32) -> Result<Self> {
        if seconds == 0 {
            return Err(Error::InvalidInterval {
                value: "0s".to_string(),
            });
        }
        Ok(Self { seconds })
    }

    /// Create an interval from minutes.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        let seconds = minutes.checked_mul(60).ok_or_else(|| Error::InvalidInterval {
            value: format!("{minutes}min"),
        })?;
        Self::from_seconds(seconds)
    }

    /// Length in seconds.
    pub const fn seconds(self) -> u32 {
        self.seconds
    }

    /// Length as a chrono delta.
    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.seconds))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s % 86_400 == 0 {
            write!(f, "{}d", s / 86_400)
        } else if s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s % 60 == 0 {
            write!(f, "{}min", s / 60)
        } else {
            write!(f, "{s}s")
        }
    }
}

impl FromStr for Interval {
    type Err = Error;

    /// Parse `15min`, `15m`, `1h`, `30s`, `1d` or a bare number of minutes.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInterval {
            value: s.to_string(),
        };
        let text = s.trim().to_lowercase();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);
        let number: u32 = number.parse().map_err(|_| invalid())?;

        let multiplier: u32 = match unit.trim() {
            "" | "m" | "min" | "mins" | "minute" | "minutes" | "t" => 60,
            "s" | "sec" | "secs" | "second" | "seconds" => 1,
            "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
            "d" | "day" | "days" => 86_400,
            _ => return Err(invalid()),
        };

        let seconds = number.checked_mul(multiplier).ok_or_else(invalid)?;
        Self::from_seconds(seconds).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Interval {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}
