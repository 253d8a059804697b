//! CLI argument validators.
//!
//! Value parsers shared by the subcommands.

use crate::constants::MAX_DECIMALS;
use crate::log::{Channel, Interval, Metric};
use crate::period::{ClockTime, PeriodSelector};
use std::path::PathBuf;

/// A log input: a file or directory, optionally named with `NAME=PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogArg {
    /// Explicit log name.
    pub name: Option<String>,
    /// File or directory path.
    pub path: PathBuf,
}

/// Parse a `HH:MM` clock time.
pub fn parse_clock_time(s: &str) -> Result<ClockTime, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

/// Parse an interval such as `15min`, `1h` or a bare number of minutes.
pub fn parse_interval(s: &str) -> Result<Interval, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

/// Parse an Lmax rank (1 = highest).
pub fn parse_rank(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("rank must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid rank '{s}': {e}")),
    }
}

/// Parse a fixed number of output decimals.
pub fn parse_decimals(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n <= MAX_DECIMALS => Ok(n),
        Ok(n) => Err(format!("decimals must be at most {MAX_DECIMALS}, got {n}")),
        Err(e) => Err(format!("invalid decimals '{s}': {e}")),
    }
}

/// Parse `days`, `evenings` or `nights`.
pub fn parse_period_selector(s: &str) -> Result<PeriodSelector, String> {
    s.parse()
}

/// Parse a channel: a metric alone means its broadband level (`L90` is
/// `L90 A`), otherwise `<metric> <band>` (`Lmax 125`).
pub fn parse_channel(s: &str) -> Result<Channel, String> {
    if s.split_whitespace().count() == 1 {
        s.parse::<Metric>().map(Channel::broadband)
    } else {
        s.parse()
    }
}

/// Parse `PATH` or `NAME=PATH`.
pub fn parse_log_arg(s: &str) -> Result<LogArg, String> {
    if s.trim().is_empty() {
        return Err("log path cannot be empty".to_string());
    }
    match s.split_once('=') {
        Some((name, path)) if !name.is_empty() && !name.contains(['/', '\\']) => {
            if path.is_empty() {
                return Err(format!("missing path for log '{name}'"));
            }
            Ok(LogArg {
                name: Some(name.to_string()),
                path: PathBuf::from(path),
            })
        }
        _ => Ok(LogArg {
            name: None,
            path: PathBuf::from(s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Band;

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("07:30").ok().map(|t| t.to_string()), Some("07:30".to_string()));
        assert!(parse_clock_time("24:00").is_err());
        assert!(parse_clock_time("noon").is_err());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("2min").ok().map(Interval::seconds), Some(120));
        assert!(parse_interval("0").is_err());
    }

    #[test]
    fn test_parse_channel_defaults_to_broadband() {
        assert_eq!(parse_channel("L90").ok(), Some(Channel::broadband(Metric::L90)));
        assert_eq!(
            parse_channel("Leq 125").ok(),
            Some(Channel::new(Metric::Leq, Band::Octave(125)))
        );
        assert!(parse_channel("L10").is_err());
    }

    #[test]
    fn test_parse_log_arg() {
        assert_eq!(
            parse_log_arg("north=logs/a.csv").ok(),
            Some(LogArg {
                name: Some("north".to_string()),
                path: PathBuf::from("logs/a.csv"),
            })
        );
        assert_eq!(parse_log_arg("logs/a.csv").ok().and_then(|a| a.name), None);
        assert_eq!(parse_log_arg("dir/x=y.csv").ok().and_then(|a| a.name), None);
        assert!(parse_log_arg("north=").is_err());
        assert!(parse_log_arg("").is_err());
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank("10").ok(), Some(10));
        assert!(parse_rank("0").is_err());
        assert!(parse_rank("-1").is_err());
    }

    #[test]
    fn test_parse_decimals_is_bounded() {
        assert_eq!(parse_decimals("0").ok(), Some(0));
        assert_eq!(parse_decimals("17").ok(), Some(17));
        assert!(parse_decimals("18").is_err());
        assert!(parse_decimals("1000000000").is_err());
        assert!(parse_decimals("two").is_err());
    }

    #[test]
    fn test_parse_period_selector() {
        assert_eq!(parse_period_selector("nights").ok(), Some(PeriodSelector::Nights));
        assert!(parse_period_selector("weekends").is_err());
    }
}
