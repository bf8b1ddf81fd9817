//! The fixed textual timestamp carried by every message.
//!
//! Format is `MM/DD/YYYY HH:MM:SS`, 24-hour clock, zero padded.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::RelayError;

/// chrono pattern for message dates.
pub const DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Render a timestamp in the message date format.
pub fn format_date(at: DateTime<Utc>) -> String {
    format_naive(at.naive_utc())
}

pub fn format_naive(at: NaiveDateTime) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// Parse a message date back into a naive timestamp (durable store column).
pub fn parse_date(s: &str) -> Result<NaiveDateTime, RelayError> {
    NaiveDateTime::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| RelayError::decode(format!("invalid message date {s:?}: {e}")))
}

/// Shape check for `MM/DD/YYYY HH:MM:SS` (digits and separators only).
pub fn is_message_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 19 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'/',
        10 => *b == b' ',
        13 | 16 => *b == b':',
        _ => b.is_ascii_digit(),
    })
}
