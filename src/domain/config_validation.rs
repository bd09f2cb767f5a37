//! Configuration validation.
//!
//! Validates all report fields before a run touches any data.

use crate::domain::error::BuffetError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_finance_config(config: &dyn ConfigPort) -> Result<(), BuffetError> {
    match config.get_string("data", "finance_data") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BuffetError::ConfigMissing {
            section: "data".to_string(),
            key: "finance_data".to_string(),
        }),
    }
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), BuffetError> {
    validate_report_period(config)?;
    validate_symbols(config)?;
    Ok(())
}

/// Everything except `[report] symbols`, for runs that name their own
/// symbols.
pub fn validate_report_period(config: &dyn ConfigPort) -> Result<(), BuffetError> {
    validate_finance_config(config)?;
    validate_dates(config)
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BuffetError> {
    let start_str = config.get_string("report", "start_date");
    let end_str = config.get_string("report", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(BuffetError::ConfigInvalid {
            section: "report".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, BuffetError> {
    match value {
        None => Err(BuffetError::ConfigMissing {
            section: "report".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            BuffetError::ConfigInvalid {
                section: "report".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), BuffetError> {
    match config.get_string("report", "symbols") {
        Some(s) if !s.trim().is_empty() => {
            parse_symbols(&s).map_err(|e| BuffetError::ConfigInvalid {
                section: "report".to_string(),
                key: "symbols".to_string(),
                reason: e.to_string(),
            })?;
            Ok(())
        }
        _ => Err(BuffetError::ConfigMissing {
            section: "report".to_string(),
            key: "symbols".to_string(),
        }),
    }
}
