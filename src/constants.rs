//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "noise-survey";

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";

/// Largest fixed number of decimals accepted for CSV and text output.
pub const MAX_DECIMALS: usize = 17;

/// Minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Seconds in a day.
pub const SECONDS_PER_DAY: u32 = MINUTES_PER_DAY * 60;

/// Default period anchors as (hour, minute).
///
/// Evening and night share a start, so the evening period is disabled
/// until a user moves one of them.
pub mod periods {
    /// Default start of the daytime period.
    pub const DAY_START: (u32, u32) = (7, 0);
    /// Default start of the evening period.
    pub const EVENING_START: (u32, u32) = (23, 0);
    /// Default start of the night-time period.
    pub const NIGHT_START: (u32, u32) = (23, 0);
}

/// Octave band centre frequencies in Hz, in column order.
pub const OCTAVE_BANDS: [u32; 8] = [63, 125, 250, 500, 1000, 2000, 4000, 8000];

/// Accepted headers for the timestamp column (compared case-insensitively).
pub const TIME_COLUMN_NAMES: &[&str] = &["time", "timestamp", "date/time", "datetime"];

/// Accepted timestamp formats, tried in order.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Format used when writing timestamps to tables.
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used when writing times of day to tables.
pub const TIME_OUTPUT_FORMAT: &str = "%H:%M";

/// Format used when writing survey dates to tables.
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Percentile applied when combining L90 values (the level exceeded 90% of the time).
pub const L90_PERCENTILE: f64 = 10.0;

/// Analysis defaults mirrored by the configuration file.
pub mod defaults {
    /// Default resampling interval for time histories and exports.
    pub const RESAMPLE: &str = "15min";
    /// Default rank for the nth-highest Lmax.
    pub const LMAX_N: usize = 10;
    /// Default time resolution for Lmax ranking.
    pub const LMAX_RESOLUTION: &str = "2min";
    /// Default period for Lmax spectra.
    pub const LMAX_PERIOD: &str = "nights";
    /// Default metric for modal values and counts.
    pub const MODAL_METRIC: &str = "L90";
    /// Default daytime resolution for modal values.
    pub const MODAL_DAY: &str = "60min";
    /// Default evening resolution for modal values.
    pub const MODAL_EVENING: &str = "60min";
    /// Default night-time resolution for modal values.
    pub const MODAL_NIGHT: &str = "15min";
}

/// Workbook export constants.
pub mod workbook {
    /// Maximum sheet name length accepted by spreadsheet applications.
    pub const MAX_SHEET_NAME_LEN: usize = 31;
    /// Characters not allowed in sheet names.
    pub const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
    /// Fallback sheet name when sanitising leaves nothing.
    pub const FALLBACK_SHEET_NAME: &str = "Sheet1";
    /// Default workbook file name for the export command.
    pub const DEFAULT_FILE_NAME: &str = "noise-survey-analysis.xlsx";
}

/// Separator used when flattening multi-level column headers.
pub const HEADER_SEPARATOR: &str = " | ";

/// Supported log file extensions.
pub const LOG_EXTENSIONS: &[&str] = &["csv"];
