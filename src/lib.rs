//! Noise survey - environmental noise survey analysis.
//!
//! This crate parses sound level meter logs, classifies samples into
//! daytime, evening and night-time periods and produces the summary tables
//! used in residential noise assessments.

#![warn(missing_docs)]

pub mod acoustics;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod log;
pub mod output;
pub mod period;
pub mod survey;
pub mod table;

use clap::Parser;
use cli::{Cli, Command, LmaxArgs, ModalArgs, OutputArgs, SurveyArgs};
use config::{Config, config_file_path, load_default_config, save_default_config, validate_config};
use export::{CsvOptions, Workbook, write_template};
use log::{Interval, Log, collect_log_files, default_log_name};
use output::{emit, progress, render_sections, render_table};
use period::{PeriodSelector, PeriodTimes};
use std::path::{Path, PathBuf};
use survey::{PeriodIntervals, Survey};
use table::Table;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the noise-survey CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = load_default_config()?;
    let show_progress = !cli.no_progress && !cli.quiet;

    handle_command(cli.command, &config, show_progress)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn handle_command(command: Command, config: &Config, show_progress: bool) -> Result<()> {
    match command {
        Command::Summary { survey, output } => {
            let survey = build_survey(&survey, config, show_progress)?;
            write_output(&survey.residential_summary(), &output, config)
        }
        Command::Leq { survey, output } => {
            let survey = build_survey(&survey, config, show_progress)?;
            write_output(&survey.leq_spectra(), &output, config)
        }
        Command::Lmax {
            survey,
            lmax,
            output,
        } => {
            let survey = build_survey(&survey, config, show_progress)?;
            let (n, resolution, selector) = lmax_settings(&lmax, config)?;
            let table = survey.lmax_spectra(n, resolution, selector)?;
            write_output(&table, &output, config)
        }
        Command::Modal {
            survey,
            modal,
            by_date,
            output,
        } => {
            let survey = build_survey(&survey, config, show_progress)?;
            let (channel, intervals) = modal_settings(&modal, config)?;
            let table = survey.modal(channel, by_date, &intervals)?;
            write_output(&table, &output, config)
        }
        Command::Counts {
            survey,
            modal,
            output,
        } => {
            let survey = build_survey(&survey, config, show_progress)?;
            let (channel, intervals) = modal_settings(&modal, config)?;
            let table = survey.counts(channel, &intervals)?;
            write_output(&table, &output, config)
        }
        Command::Resample {
            survey,
            interval,
            log,
            output,
        } => {
            let survey = build_survey(&survey, config, show_progress)?;
            let interval = interval.map_or_else(|| config.defaults.resample_interval(), Ok)?;
            if let Some(name) = log {
                return write_output(&survey.resampled_table(&name, interval)?, &output, config);
            }
            let sections = resampled_sections(&survey, interval)?;
            let refs: Vec<(&str, &Table)> = sections
                .iter()
                .map(|(title, table)| (title.as_str(), table))
                .collect();
            let bytes = render_sections(&refs, output.format, &csv_options(&output, config))?;
            emit(&bytes, output.output.as_deref())
        }
        Command::Export {
            survey,
            output,
            resample,
            lmax,
            modal,
            header,
            no_csv_bom,
        } => {
            let survey = build_survey(&survey, config, show_progress)?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(constants::workbook::DEFAULT_FILE_NAME));
            let mut options = config.export.csv_options();
            options.header = header.unwrap_or(options.header);
            options.bom &= !no_csv_bom;
            export_survey(&survey, &path, resample, &lmax, &modal, &options, config)
        }
        Command::Template { output } => {
            let mut bytes = Vec::new();
            write_template(&mut bytes)?;
            emit(&bytes, output.as_deref())
        }
        Command::Config { action } => handle_config_command(action),
    }
}

/// Resolve the period anchors from the configuration and CLI overrides.
fn resolve_periods(args: &SurveyArgs, config: &Config) -> Result<PeriodTimes> {
    let day = args.day.unwrap_or(config.periods.day);
    let night = args.night.unwrap_or(config.periods.night);
    let evening = match args.evening {
        _ if args.no_evening => night,
        Some(evening) => evening,
        // A disabled evening follows the night anchor when only night moves.
        None if config.periods.evening == config.periods.night => night,
        None => config.periods.evening,
    };
    PeriodTimes::new(day, evening, night)
}

/// Load every log named on the command line into a survey.
fn build_survey(args: &SurveyArgs, config: &Config, show_progress: bool) -> Result<Survey> {
    validate_config(config)?;
    let periods = resolve_periods(args, config)?;
    info!("Survey periods: {periods}");

    let mut inputs: Vec<(Option<&str>, PathBuf)> = Vec::new();
    for arg in &args.logs {
        let files = collect_log_files(std::slice::from_ref(&arg.path))?;
        inputs.extend(files.into_iter().map(|path| (arg.name.as_deref(), path)));
    }
    if inputs.is_empty() {
        return Err(Error::NoLogs);
    }

    let mut survey = Survey::with_periods(periods);
    let pb = progress::create_log_progress(inputs.len(), show_progress);

    for (name, path) in &inputs {
        progress::set_progress_message(pb.as_ref(), &path.display().to_string());
        match Log::from_path(path) {
            Ok(log) => {
                let desired = name.map_or_else(|| default_log_name(path), str::to_string);
                let actual = survey.attach_log(&desired, log)?;
                if actual != desired {
                    info!("Log name '{desired}' is taken, using '{actual}'");
                }
            }
            Err(e) if args.fail_fast => {
                progress::finish_progress(pb, "failed");
                return Err(e);
            }
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
        progress::inc_progress(pb.as_ref());
    }
    progress::finish_progress(pb, "done");

    if survey.is_empty() {
        return Err(Error::NoLogs);
    }
    if let Some(only) = &args.only {
        survey = survey.subset(only)?;
    }
    info!("Analysing {} log(s)", survey.len());
    Ok(survey)
}

fn lmax_settings(args: &LmaxArgs, config: &Config) -> Result<(usize, Interval, PeriodSelector)> {
    let n = args.rank.unwrap_or(config.defaults.lmax_n);
    let resolution = args.resolution.map_or_else(|| config.defaults.lmax_interval(), Ok)?;
    let selector = args.period.map_or_else(|| config.defaults.lmax_selector(), Ok)?;
    Ok((n, resolution, selector))
}

fn modal_settings(args: &ModalArgs, config: &Config) -> Result<(log::Channel, PeriodIntervals)> {
    let channel = args.metric.map_or_else(|| config.defaults.modal_channel(), Ok)?;
    let defaults = config.defaults.modal_intervals()?;
    let intervals = PeriodIntervals::new(
        args.day_t.unwrap_or(defaults.day),
        args.evening_t.unwrap_or(defaults.evening),
        args.night_t.unwrap_or(defaults.night),
    );
    Ok((channel, intervals))
}

fn csv_options(args: &OutputArgs, config: &Config) -> CsvOptions {
    let mut options = config.export.csv_options();
    if let Some(header) = args.header {
        options.header = header;
    }
    if args.no_csv_bom {
        options.bom = false;
    }
    if args.decimals.is_some() {
        options.decimals = args.decimals;
    }
    options
}

fn write_output(table: &Table, args: &OutputArgs, config: &Config) -> Result<()> {
    if table.is_empty() {
        info!("No rows to report");
    }
    let bytes = render_table(table, args.format, &csv_options(args, config))?;
    emit(&bytes, args.output.as_deref())
}

fn resampled_sections(survey: &Survey, interval: Interval) -> Result<Vec<(String, Table)>> {
    survey
        .names()
        .map(|name| {
            let table = survey.resampled_table(name, interval)?;
            Ok((format!("Resampled - {name}"), table))
        })
        .collect()
}

/// Write every analysis to a workbook, or to one sectioned CSV file when
/// the destination ends in `.csv`.
fn export_survey(
    survey: &Survey,
    path: &Path,
    resample: Option<Interval>,
    lmax: &LmaxArgs,
    modal: &ModalArgs,
    options: &CsvOptions,
    config: &Config,
) -> Result<()> {
    let interval = resample.map_or_else(|| config.defaults.resample_interval(), Ok)?;
    let (n, resolution, selector) = lmax_settings(lmax, config)?;
    let (channel, intervals) = modal_settings(modal, config)?;

    let mut sections = vec![
        ("Broadband Summary".to_string(), survey.residential_summary()),
        ("Leq Spectra".to_string(), survey.leq_spectra()),
        ("Lmax Spectra".to_string(), survey.lmax_spectra(n, resolution, selector)?),
        ("Modal Values".to_string(), survey.modal(channel, false, &intervals)?),
    ];
    sections.extend(resampled_sections(survey, interval)?);
    let refs: Vec<(&str, &Table)> = sections
        .iter()
        .map(|(title, table)| (title.as_str(), table))
        .collect();

    if log::is_log_file(path) {
        let bytes = render_sections(&refs, output::OutputFormat::Csv, options)?;
        emit(&bytes, Some(path))?;
        let written = refs.iter().filter(|(_, table)| !table.is_empty()).count();
        info!("Wrote {written} section(s) to {}", path.display());
        return Ok(());
    }

    let mut workbook = Workbook::new();
    for (title, table) in &refs {
        workbook.add_sheet(title, table);
    }
    workbook.save(path)
}

fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let text =
                toml::to_string_pretty(&config).map_err(|source| Error::ConfigSerialize { source })?;
            print!("{text}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
