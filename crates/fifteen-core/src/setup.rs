//! Input handling for the wake/sleep setup flow.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ValidationError;

/// Reject a wake/sleep pair unless wake is strictly before sleep.
pub fn validate_bounds(wake: NaiveDateTime, sleep: NaiveDateTime) -> Result<(), ValidationError> {
    if wake < sleep {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeRange { wake, sleep })
    }
}

/// Parse `HH:MM` (24h).
pub fn parse_clock_time(input: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|e| ValidationError::InvalidValue {
        field: "time".to_string(),
        message: format!("'{}' is not HH:MM ({e})", input.trim()),
    })
}

/// Wake and sleep instants on `date` from two `HH:MM` strings.
pub fn bounds_on(
    date: NaiveDate,
    wake: &str,
    sleep: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), ValidationError> {
    let wake = date.and_time(parse_clock_time(wake)?);
    let sleep = date.and_time(parse_clock_time(sleep)?);
    validate_bounds(wake, sleep)?;
    Ok((wake, sleep))
}
