//! Wall-clock time helpers for calendar events.
//!
//! Event times are local wall-clock [`NaiveDateTime`] values. Hour arithmetic
//! adds to the clock reading directly and does not correct for daylight
//! saving transitions.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};

/// RFC 3339-like layout without seconds, e.g. `2025-06-01T10:00+02:00`.
const OFFSET_NO_SECONDS: &str = "%Y-%m-%dT%H:%M%#z";

/// Naive layouts accepted besides RFC 3339.
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an instant from the API into local wall-clock time.
///
/// Accepts RFC 3339 with an offset (converted to the local zone), naive
/// date-times with `T` or space separator, and bare dates (midnight).
/// Returns `None` for anything else, including empty strings.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, OFFSET_NO_SECONDS))
    {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Adds whole hours to a wall-clock time.
///
/// Returns `None` if the result is out of chrono's representable range.
pub fn add_hours(start: NaiveDateTime, hours: i64) -> Option<NaiveDateTime> {
    start.checked_add_signed(Duration::hours(hours))
}
