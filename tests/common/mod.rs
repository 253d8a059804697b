//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use chrono::{NaiveDateTime, TimeDelta};
use noise_survey::log::Log;
use std::fmt::Write;

/// Header of generated logs: broadband plus the 63 and 125 Hz bands.
pub const HEADER: &str = "Time,Leq A,Lmax A,L90 A,Leq 63,Leq 125,Lmax 63,Lmax 125";

/// Parse `YYYY-MM-DD HH:MM`.
pub fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap()
}

/// Generate a log with `rows` samples every `step_minutes` from `start`.
///
/// `level(i)` gives the broadband Leq of row `i`; the other channels are
/// fixed offsets from it.
pub fn log_csv(start: &str, rows: usize, step_minutes: i64, level: impl Fn(usize) -> f64) -> String {
    let start = ts(start);
    let mut csv = format!("{HEADER}\n");
    for i in 0..rows {
        let t = start + TimeDelta::minutes(step_minutes * i64::try_from(i).unwrap());
        let l = level(i);
        writeln!(
            csv,
            "{},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1}",
            t.format("%Y-%m-%d %H:%M:%S"),
            l,
            l + 10.0,
            l - 8.0,
            l + 5.0,
            l + 2.0,
            l + 15.0,
            l + 12.0
        )
        .unwrap();
    }
    csv
}

/// Parse generated CSV into a log.
pub fn log_from(csv: &str) -> Log {
    Log::from_bytes(csv.as_bytes(), "fixture").unwrap()
}

/// A slowly varying level pattern with a daily cycle.
pub fn daily_pattern(i: usize) -> f64 {
    let minute = (i % 1440) as f64;
    45.0 + 10.0 * (minute / 1440.0 * std::f64::consts::TAU).sin() + (i % 7) as f64 * 0.3
}
