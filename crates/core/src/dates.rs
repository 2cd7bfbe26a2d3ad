use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Signature shared by every last-access parsing strategy.
pub type DateParser = fn(&Value) -> Option<DateTime<Utc>>;

const SECONDS_PER_DAY: i64 = 86_400;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// `%z` takes both `+0200` and `+02:00`.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

/// Parse a last-access value as ISO-8601, falling back to a Unix timestamp.
///
/// Offset-aware strings are converted to UTC; naive ones are taken as UTC.
/// Numbers are read as whole seconds since the epoch. Anything else is `None`,
/// which callers treat as "never accessed".
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            let secs = match n.as_i64() {
                Some(i) => i,
                None => {
                    let f = n.as_f64()?.trunc();
                    if !f.is_finite() || f.abs() > i64::MAX as f64 {
                        return None;
                    }
                    f as i64
                }
            };
            DateTime::from_timestamp(secs, 0)
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    parse_iso8601(s).or_else(|| {
        s.parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    })
}

fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    parse_hour_only(s).or_else(|| parse_basic_date(s))
}

/// `YYYY-MM-DDTHH` or `YYYY-MM-DD HH`; chrono will not build a datetime without minutes.
fn parse_hour_only(s: &str) -> Option<DateTime<Utc>> {
    if s.len() != 13 || !matches!(s.as_bytes()[10], b'T' | b' ') {
        return None;
    }
    let date = NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()?;
    let hour = s.get(11..)?.parse::<u32>().ok()?;
    date.and_hms_opt(hour, 0, 0).map(|dt| dt.and_utc())
}

/// Basic-format `YYYYMMDD`; must be tried before the Unix-seconds fallback.
fn parse_basic_date(s: &str) -> Option<DateTime<Utc>> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[..4].parse::<i32>().ok()?;
    let month = s[4..6].parse::<u32>().ok()?;
    let day = s[6..].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

/// Whole days elapsed from `last` to `now`, floored. `None` when there is no timestamp.
pub fn days_since(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    last.map(|dt| (now - dt).num_seconds().div_euclid(SECONDS_PER_DAY))
}
