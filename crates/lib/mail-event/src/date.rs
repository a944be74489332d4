//! Date header handling.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};

use crate::ParseError;

/// Parse an RFC 2822 `Date` header value, keeping the declared offset.
///
/// A trailing comment like `(CEST)` is ignored. Anything else that is not a
/// valid RFC 2822 date is rejected.
pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let trimmed = strip_trailing_comment(value.trim());

    DateTime::parse_from_rfc2822(trimmed).map_err(|_| ParseError::MalformedDate {
        value: value.to_owned(),
    })
}

/// Render a date in the target timezone as ISO 8601 with whole seconds.
pub fn format_date(date: &DateTime<FixedOffset>, timezone: chrono_tz::Tz) -> String {
    date.with_timezone(&timezone)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Render a local processing time as ISO 8601 with whole seconds and no offset.
pub fn format_received(received: &NaiveDateTime) -> String {
    received.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Drop a single trailing `( ... )` comment.
fn strip_trailing_comment(value: &str) -> &str {
    if !value.ends_with(')') {
        return value;
    }
    match value.rfind('(') {
        Some(start) => value[..start].trim_end(),
        None => value,
    }
}
