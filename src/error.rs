//! Error types for noise-survey.

/// Result type alias for noise-survey operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for noise-survey.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Day/evening/night anchors do not describe a valid partition of the clock.
    #[error("invalid survey periods: {message}")]
    InvalidPeriods {
        /// Description of the conflict.
        message: String,
    },

    /// Clock time could not be parsed.
    #[error("invalid clock time '{value}' (expected HH:MM)")]
    InvalidClockTime {
        /// Invalid value.
        value: String,
    },

    /// Resampling interval could not be parsed or is not positive.
    #[error("invalid interval '{value}' (expected e.g. 15min, 1h, 30s)")]
    InvalidInterval {
        /// Invalid value.
        value: String,
    },

    /// Aggregation or resampling parameter is out of range.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Failed to open or read a log file.
    #[error("failed to read log file '{path}'")]
    LogRead {
        /// Path to the log file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Log contents are malformed.
    #[error("failed to parse log '{name}': {message}")]
    LogParse {
        /// Name of the log (file name or caller-supplied label).
        name: String,
        /// Description of the problem.
        message: String,
    },

    /// Log lacks required metric columns.
    #[error("log '{name}' is missing required columns: {}", missing.join(", "))]
    MissingChannels {
        /// Name of the log.
        name: String,
        /// Column headers that were expected but not found.
        missing: Vec<String>,
    },

    /// Log name is empty.
    #[error("log name cannot be empty")]
    EmptyLogName,

    /// A log with this name is already part of the survey.
    #[error("log '{name}' already exists in the survey")]
    DuplicateLogName {
        /// Conflicting name.
        name: String,
    },

    /// No log with this name is part of the survey.
    #[error("log '{name}' not found in the survey")]
    LogNotFound {
        /// Missing name.
        name: String,
    },

    /// No valid log files found.
    #[error("no valid log files found in the provided paths")]
    NoLogs,

    /// Failed to write CSV output.
    #[error("failed to write CSV output")]
    CsvWrite {
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to read a CSV table.
    #[error("failed to read CSV table: {message}")]
    CsvRead {
        /// Description of the problem.
        message: String,
    },

    /// Failed to assemble the workbook archive.
    #[error("failed to write workbook")]
    WorkbookWrite {
        /// Underlying archive error.
        #[source]
        source: zip::result::ZipError,
    },

    /// Workbook has no sheets to write.
    #[error("workbook has no non-empty sheets")]
    EmptyWorkbook,

    /// Failed to write an output file.
    #[error("failed to write output file '{path}'")]
    OutputWrite {
        /// Path to the output file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to write JSON output")]
    JsonWrite {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`].
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::LogParse`].
    pub(crate) fn log_parse(name: &str, message: impl Into<String>) -> Self {
        Self::LogParse {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_channels_lists_columns() {
        let err = Error::MissingChannels {
            name: "site-a".to_string(),
            missing: vec!["Leq A".to_string(), "L90 A".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "log 'site-a' is missing required columns: Leq A, L90 A"
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = Error::invalid_parameter("n must be at least 1");
        assert_eq!(err.to_string(), "invalid parameter: n must be at least 1");
    }
}
