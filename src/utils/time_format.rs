//! Conversion between elapsed milliseconds and `HH:MM:SS` display strings

use thiserror::Error;

pub const SECOND_MS: u64 = 1_000;
pub const MINUTE_MS: u64 = SECOND_MS * 60;
pub const HOUR_MS: u64 = MINUTE_MS * 60;

/// Failure to read a `HH:MM:SS` value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Expected 3 ':'-separated fields, got {0}")]
    FieldCount(usize),

    #[error("Field '{0}' is not a base-10 integer")]
    InvalidField(String),

    #[error("Time value is too large")]
    OutOfRange,
}

/// Render milliseconds as zero-padded `HH:MM:SS`.
///
/// Sub-second remainders are truncated. Hours keep growing past two digits.
pub fn format_ms(ms: u64) -> String {
    let hours = ms / HOUR_MS;
    let minutes = (ms % HOUR_MS) / MINUTE_MS;
    let seconds = (ms % MINUTE_MS) / SECOND_MS;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse `HH:MM:SS` into milliseconds.
///
/// Minutes and seconds are not range checked, so `"00:90:00"` is 90 minutes.
pub fn parse_ms(text: &str) -> Result<u64, FormatError> {
    let fields: Vec<&str> = text.split(':').collect();
    if fields.len() != 3 {
        return Err(FormatError::FieldCount(fields.len()));
    }

    let mut total: u64 = 0;
    for (field, unit) in fields.iter().zip([HOUR_MS, MINUTE_MS, SECOND_MS]) {
        let value = parse_field(field)?;
        total = value
            .checked_mul(unit)
            .and_then(|part| total.checked_add(part))
            .ok_or(FormatError::OutOfRange)?;
    }

    Ok(total)
}

fn parse_field(field: &str) -> Result<u64, FormatError> {
    let trimmed = field.trim();
    // u64::from_str accepts a leading '+', which is not a plain digit string
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidField(field.to_string()));
    }

    trimmed.parse::<u64>().map_err(|_| FormatError::OutOfRange)
}
