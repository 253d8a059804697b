//! CLI argument parsing and command handling.

mod args;
mod validators;

pub use args::{Cli, Command, ConfigAction, LmaxArgs, ModalArgs, OutputArgs, SurveyArgs};
pub use validators::{
    LogArg, parse_channel, parse_clock_time, parse_decimals, parse_interval, parse_log_arg,
    parse_period_selector, parse_rank,
};
