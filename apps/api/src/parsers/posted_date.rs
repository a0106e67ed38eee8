//! Posted-date parsing for relative ("3 days ago") and absolute date strings.
//!
//! Relative units use fixed lengths: a month is 30 days and a year 365 days.
//! Results must stay reproducible, so no calendar arithmetic is done.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RELATIVE_RE: Regex =
        Regex::new(r"(?i)(\d+)\s+(minute|hour|day|week|month|year)s?\s+ago").unwrap();
}

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

fn unit_millis(unit: &str) -> Option<i64> {
    match unit {
        "minute" => Some(MINUTE_MS),
        "hour" => Some(HOUR_MS),
        "day" => Some(DAY_MS),
        "week" => Some(7 * DAY_MS),
        "month" => Some(30 * DAY_MS),
        "year" => Some(365 * DAY_MS),
        _ => None,
    }
}

/// Parses a posted-date string relative to `now`.
/// Returns `None` for blank or unrecognised text.
pub fn parse_posted_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.to_lowercase().contains("just now") {
        return Some(now);
    }

    if let Some(caps) = RELATIVE_RE.captures(text) {
        let value: i64 = caps[1].parse().ok()?;
        let unit = unit_millis(&caps[2].to_lowercase())?;
        let offset = Duration::try_milliseconds(value.checked_mul(unit)?)?;
        return now.checked_sub_signed(offset);
    }

    parse_absolute(text)
}

/// Milliseconds since the epoch, or `0` when the text cannot be parsed.
pub fn posted_timestamp_millis(text: &str, now: DateTime<Utc>) -> i64 {
    parse_posted_date(text, now)
        .map(|t| t.timestamp_millis())
        .unwrap_or(0)
}

/// Absolute timestamps without an offset are taken as UTC.
fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
