use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use crate::core::error::{Error, ErrorKind, Result};

// Wall-clock formats, interpreted as UTC
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date literal: epoch millis, RFC 3339, `yyyy-MM-dd[ HH:mm[:ss]]`.
pub fn parse_date(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(millis) = text.parse::<i64>() {
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| invalid_date(text));
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid_date(text))
}

fn invalid_date(text: &str) -> Error {
    Error::new(ErrorKind::Parse, format!("'{}' is not a valid date", text))
}
