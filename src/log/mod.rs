//! Sound level meter logs.
//!
//! A log is parsed once from CSV into a [`TimeSeries`] at its native
//! sampling interval and can then be resampled to any coarser
//! [`Interval`].

mod channel;
mod discover;
mod interval;
mod measurement;
mod parser;
mod series;

pub use channel::{Band, Channel, Metric};
pub use discover::{collect_log_files, default_log_name, is_log_file};
pub use interval::Interval;
pub use measurement::Log;
pub use parser::{parse_series, parse_timestamp};
pub use series::TimeSeries;
