//! Configuration validation.
//!
//! Checks the projection config before any simulation runs. The engine accepts
//! any finite input; these checks only reject values that cannot be meant.

use crate::domain::aggregate::TimePeriod;
use crate::domain::display::DisplayMode;
use crate::domain::error::FincastError;
use crate::domain::recurrence::parse_month;
use crate::domain::settings::MAX_PROJECTION_YEARS;
use crate::ports::config_port::ConfigPort;

pub fn validate_projection_config(config: &dyn ConfigPort) -> Result<(), FincastError> {
    validate_finite(config, "initial_balance")?;
    validate_finite(config, "monthly_return_rate")?;
    validate_projection_years(config)?;
    validate_allocation(config)?;
    validate_start_month(config)?;
    validate_report(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FincastError {
    FincastError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_finite(config: &dyn ConfigPort, key: &str) -> Result<(), FincastError> {
    let raw = match config.get_string("projection", key) {
        Some(s) => s,
        None => return Ok(()),
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(()),
        Ok(_) => Err(invalid("projection", key, format!("{key} must be finite"))),
        Err(_) => Err(invalid("projection", key, format!("{key} must be a number"))),
    }
}

fn validate_projection_years(config: &dyn ConfigPort) -> Result<(), FincastError> {
    let raw = match config.get_string("projection", "projection_years") {
        Some(s) => s,
        None => return Ok(()),
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v < 0 => Err(invalid(
            "projection",
            "projection_years",
            "projection_years must be a non-negative whole number",
        )),
        Ok(v) if v > MAX_PROJECTION_YEARS as i64 => Err(invalid(
            "projection",
            "projection_years",
            format!("projection_years must be at most {MAX_PROJECTION_YEARS}"),
        )),
        Ok(_) => Ok(()),
        Err(_) => Err(invalid(
            "projection",
            "projection_years",
            "projection_years must be a whole number",
        )),
    }
}

fn validate_allocation(config: &dyn ConfigPort) -> Result<(), FincastError> {
    validate_finite(config, "investment_allocation")?;
    let value = config.get_double("projection", "investment_allocation", 0.0);
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            "projection",
            "investment_allocation",
            "investment_allocation must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_start_month(config: &dyn ConfigPort) -> Result<(), FincastError> {
    match config.get_string("projection", "start_month") {
        Some(s) if parse_month(&s).is_none() => Err(invalid(
            "projection",
            "start_month",
            "invalid start_month format, expected YYYY-MM",
        )),
        _ => Ok(()),
    }
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), FincastError> {
    if let Some(s) = config.get_string("report", "period") {
        s.parse::<TimePeriod>()
            .map_err(|reason| invalid("report", "period", reason))?;
    }
    if let Some(s) = config.get_string("report", "mode") {
        s.parse::<DisplayMode>()
            .map_err(|reason| invalid("report", "mode", reason))?;
    }
    Ok(())
}
