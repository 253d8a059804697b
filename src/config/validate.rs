//! Configuration validation.

use crate::config::Config;
use crate::constants::MAX_DECIMALS;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_periods(config)?;
    validate_defaults(config)?;
    validate_export(config)?;
    Ok(())
}

/// Period anchors must partition the clock.
fn validate_periods(config: &Config) -> Result<()> {
    config.period_times().map(|_| ()).map_err(|e| match e {
        Error::InvalidPeriods { message } => Error::ConfigValidation {
            message: format!("[periods] {message}"),
        },
        other => other,
    })
}

/// Validate default analysis settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if defaults.lmax_n == 0 {
        return Err(Error::ConfigValidation {
            message: "lmax_n must be at least 1".to_string(),
        });
    }

    defaults.resample_interval()?;
    defaults.lmax_interval()?;
    defaults.lmax_selector()?;
    defaults.modal_channel()?;
    defaults.modal_intervals()?;
    Ok(())
}

/// Validate export settings.
fn validate_export(config: &Config) -> Result<()> {
    if let Some(decimals) = config.export.decimals
        && decimals > MAX_DECIMALS
    {
        return Err(Error::ConfigValidation {
            message: format!("decimals must be at most {MAX_DECIMALS}, got {decimals}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_day_equals_night() {
        let mut config = Config::default();
        config.periods.night = config.periods.day;
        let result = validate_config(&config);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_validate_zero_lmax_n() {
        let mut config = Config::default();
        config.defaults.lmax_n = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_period_selector() {
        let mut config = Config::default();
        config.defaults.lmax_period = "weekends".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_modal_metric() {
        let mut config = Config::default();
        config.defaults.modal_metric = "L10".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_excessive_decimals() {
        let mut config = Config::default();
        config.export.decimals = Some(40);
        assert!(validate_config(&config).is_err());
    }
}
