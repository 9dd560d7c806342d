use chrono::{NaiveDateTime, SecondsFormat};

use crate::core::{AppError, Result};

/// Format accepted for report window bounds (HTML `datetime-local` input)
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a `YYYY-MM-DDThh:mm` string
///
/// The shape is checked before handing off to chrono so that single-digit
/// fields and trailing seconds are rejected instead of silently accepted.
///
/// # Arguments
/// * `field` - Request field name, used in the error message
/// * `value` - Raw value from the request body
pub fn parse_datetime_local(field: &str, value: &str) -> Result<NaiveDateTime> {
    let malformed = || {
        AppError::validation(format!(
            "Invalid {} format: '{}'. Expected YYYY-MM-DDThh:mm",
            field, value
        ))
    };

    let bytes = value.as_bytes();
    if bytes.len() != 16 {
        return Err(malformed());
    }

    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        13 => *b == b':',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return Err(malformed());
    }

    NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT).map_err(|_| malformed())
}

/// Format a stored timestamp as an ISO 8601 UTC string for API responses
pub fn format_iso8601(timestamp: NaiveDateTime) -> String {
    timestamp
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
