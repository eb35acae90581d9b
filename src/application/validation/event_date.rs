//! Event date validation.

use crate::domain::foundation::ValidationError;

/// Checks that an event date was supplied.
///
/// Only presence is enforced; any non-blank value passes. Format and range
/// rules would be added here.
pub fn validate_event_date(date: Option<&str>) -> Result<bool, ValidationError> {
    match date {
        Some(d) if !d.trim().is_empty() => Ok(true),
        _ => Err(ValidationError::missing_field("date")),
    }
}
