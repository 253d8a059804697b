//! CLI argument definitions.

use super::validators::{
    LogArg, parse_channel, parse_clock_time, parse_decimals, parse_interval, parse_log_arg,
    parse_period_selector, parse_rank,
};
use crate::export::HeaderMode;
use crate::log::{Channel, Interval};
use crate::output::OutputFormat;
use crate::period::{ClockTime, PeriodSelector};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Environmental noise survey analysis for sound level meter logs.
#[derive(Debug, Parser)]
#[command(name = "noise-survey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable progress bars.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Broadband summary per log, date and period.
    Summary {
        /// Survey inputs.
        #[command(flatten)]
        survey: SurveyArgs,
        /// Output options.
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Combined Leq spectra per period across all logs.
    Leq {
        /// Survey inputs.
        #[command(flatten)]
        survey: SurveyArgs,
        /// Output options.
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Nth-highest Lmax with synchronous octave bands, per period occurrence.
    Lmax {
        /// Survey inputs.
        #[command(flatten)]
        survey: SurveyArgs,
        /// Lmax options.
        #[command(flatten)]
        lmax: LmaxArgs,
        /// Output options.
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Modal values per period.
    Modal {
        /// Survey inputs.
        #[command(flatten)]
        survey: SurveyArgs,
        /// Modal options.
        #[command(flatten)]
        modal: ModalArgs,
        /// One row per survey date and period.
        #[arg(long)]
        by_date: bool,
        /// Output options.
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Value-count distribution per log and period.
    Counts {
        /// Survey inputs.
        #[command(flatten)]
        survey: SurveyArgs,
        /// Resolution options.
        #[command(flatten)]
        modal: ModalArgs,
        /// Output options.
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Resampled time history of each log.
    Resample {
        /// Survey inputs.
        #[command(flatten)]
        survey: SurveyArgs,
        /// Resampling interval (e.g. 15min, 1h).
        #[arg(short = 't', long, value_parser = parse_interval)]
        interval: Option<Interval>,
        /// Only this log.
        #[arg(long)]
        log: Option<String>,
        /// Output options.
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Write every analysis to one workbook (.xlsx) or sectioned CSV (.csv).
    Export {
        /// Survey inputs.
        #[command(flatten)]
        survey: SurveyArgs,
        /// Destination file.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Interval of the per-log resampled sheets.
        #[arg(long, value_parser = parse_interval)]
        resample: Option<Interval>,
        /// Lmax options.
        #[command(flatten)]
        lmax: LmaxArgs,
        /// Modal options.
        #[command(flatten)]
        modal: ModalArgs,
        /// CSV header layout (CSV destinations only).
        #[arg(long)]
        header: Option<HeaderMode>,
        /// Omit the UTF-8 BOM (CSV destinations only).
        #[arg(long)]
        no_csv_bom: bool,
    },
    /// Write an empty log template with every supported column.
    Template {
        /// Destination file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Log inputs and period overrides.
#[derive(Debug, Args)]
pub struct SurveyArgs {
    /// Log files or directories; `NAME=PATH` names a log explicitly.
    #[arg(required = true, value_parser = parse_log_arg)]
    pub logs: Vec<LogArg>,

    /// Start of the daytime period (HH:MM).
    #[arg(long, value_parser = parse_clock_time, env = "NOISE_SURVEY_DAY")]
    pub day: Option<ClockTime>,

    /// Start of the evening period (HH:MM).
    #[arg(long, value_parser = parse_clock_time, env = "NOISE_SURVEY_EVENING")]
    pub evening: Option<ClockTime>,

    /// Start of the night-time period (HH:MM).
    #[arg(long, value_parser = parse_clock_time, env = "NOISE_SURVEY_NIGHT")]
    pub night: Option<ClockTime>,

    /// Disable the evening period (evening starts with the night).
    #[arg(long, conflicts_with = "evening")]
    pub no_evening: bool,

    /// Only analyse these logs (comma-separated names).
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Stop on the first unreadable log instead of skipping it.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Options for Lmax spectra.
#[derive(Debug, Args)]
pub struct LmaxArgs {
    /// Rank of the Lmax to report (1 = highest).
    #[arg(short = 'n', long = "rank", value_parser = parse_rank)]
    pub rank: Option<usize>,

    /// Time resolution for ranking (e.g. 2min).
    #[arg(long = "lmax-resolution", value_parser = parse_interval)]
    pub resolution: Option<Interval>,

    /// Period to rank within: days, evenings or nights.
    #[arg(long = "period", value_parser = parse_period_selector)]
    pub period: Option<PeriodSelector>,
}

/// Channel and per-period resolutions for modal values and counts.
#[derive(Debug, Args)]
pub struct ModalArgs {
    /// Channel, e.g. `L90` (broadband) or `Leq 125`.
    #[arg(long, value_parser = parse_channel)]
    pub metric: Option<Channel>,

    /// Daytime resolution.
    #[arg(long, value_parser = parse_interval)]
    pub day_t: Option<Interval>,

    /// Evening resolution.
    #[arg(long, value_parser = parse_interval)]
    pub evening_t: Option<Interval>,

    /// Night-time resolution.
    #[arg(long, value_parser = parse_interval)]
    pub night_t: Option<Interval>,
}

/// Table output options.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format.
    #[arg(short, long, default_value_t = OutputFormat::Text, env = "NOISE_SURVEY_FORMAT")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// CSV header layout: flat or multi.
    #[arg(long)]
    pub header: Option<HeaderMode>,

    /// Omit the UTF-8 BOM from CSV output.
    #[arg(long)]
    pub no_csv_bom: bool,

    /// Fixed number of decimals in CSV and text output (at most 17).
    #[arg(long, value_parser = parse_decimals)]
    pub decimals: Option<usize>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::log::Metric;

    #[test]
    fn test_cli_parse_summary() {
        let cli = Cli::try_parse_from(["noise-survey", "summary", "a.csv", "north=b.csv"]).unwrap();
        let Command::Summary { survey, output } = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(survey.logs.len(), 2);
        assert_eq!(survey.logs[1].name.as_deref(), Some("north"));
        assert_eq!(output.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_parse_periods_and_format() {
        let cli = Cli::try_parse_from([
            "noise-survey",
            "leq",
            "a.csv",
            "--day",
            "07:00",
            "--evening",
            "19:00",
            "--night",
            "23:00",
            "--format",
            "csv",
            "--header",
            "multi",
        ])
        .unwrap();
        let Command::Leq { survey, output } = cli.command else {
            panic!("expected leq");
        };
        assert_eq!(survey.evening.map(|t| t.to_string()), Some("19:00".to_string()));
        assert_eq!(output.format, OutputFormat::Csv);
        assert_eq!(output.header, Some(HeaderMode::MultiRow));
    }

    #[test]
    fn test_cli_parse_lmax_options() {
        let cli = Cli::try_parse_from([
            "noise-survey",
            "lmax",
            "a.csv",
            "-n",
            "2",
            "--lmax-resolution",
            "1min",
            "--period",
            "nights",
        ])
        .unwrap();
        let Command::Lmax { lmax, .. } = cli.command else {
            panic!("expected lmax");
        };
        assert_eq!(lmax.rank, Some(2));
        assert_eq!(lmax.resolution.map(Interval::seconds), Some(60));
        assert_eq!(lmax.period, Some(PeriodSelector::Nights));
    }

    #[test]
    fn test_cli_rejects_rank_zero() {
        assert!(Cli::try_parse_from(["noise-survey", "lmax", "a.csv", "-n", "0"]).is_err());
    }

    #[test]
    fn test_cli_parse_modal() {
        let cli = Cli::try_parse_from([
            "noise-survey",
            "modal",
            "a.csv",
            "--metric",
            "Leq",
            "--by-date",
            "--night-t",
            "5min",
        ])
        .unwrap();
        let Command::Modal { modal, by_date, .. } = cli.command else {
            panic!("expected modal");
        };
        assert!(by_date);
        assert_eq!(modal.metric, Some(Channel::broadband(Metric::Leq)));
        assert_eq!(modal.night_t.map(Interval::seconds), Some(300));
    }

    #[test]
    fn test_cli_rejects_excessive_decimals() {
        let args = ["noise-survey", "summary", "a.csv", "--decimals", "1000000000"];
        assert!(Cli::try_parse_from(args).is_err());
        let cli = Cli::try_parse_from(["noise-survey", "summary", "a.csv", "--decimals", "2"]).unwrap();
        let Command::Summary { output, .. } = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(output.decimals, Some(2));
    }

    #[test]
    fn test_cli_requires_logs() {
        assert!(Cli::try_parse_from(["noise-survey", "summary"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["noise-survey", "config", "show"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_evening_conflicts_with_no_evening() {
        let cli = Cli::try_parse_from([
            "noise-survey",
            "summary",
            "a.csv",
            "--evening",
            "19:00",
            "--no-evening",
        ]);
        assert!(cli.is_err());
    }
}
