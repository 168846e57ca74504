//! Format recognizers for the string-shaped built-in types.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]+\.)+[a-zA-Z\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,}))$"#,
    )
    .expect("email expression is valid")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    let ipv4 = r"(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]\d?)(?:\.(?:25[0-5]|2[0-4]\d|1\d\d|\d{1,2})){3}";
    let label = r"(?:[a-z0-9\x{00a1}-\x{ffff}][a-z0-9\x{00a1}-\x{ffff}_-]{0,62})?[a-z0-9\x{00a1}-\x{ffff}]";
    let tld = r"[a-z\x{00a1}-\x{ffff}]{2,}\.?";
    Regex::new(&format!(
        r#"(?i)^(?:(?:https?|ftp):)?//(?:\S+(?::\S*)?@)?(?:localhost|{ipv4}|(?:{label}\.)+{tld})(?::\d{{2,5}})?(?:[/?#][^\s"]*)?$"#
    ))
    .expect("url expression is valid")
});

static HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([a-f0-9]{6}|[a-f0-9]{3})$").expect("hex expression is valid")
});

pub fn is_email(value: &str) -> bool {
    value.len() <= 320 && EMAIL.is_match(value)
}

pub fn is_url(value: &str) -> bool {
    value.len() <= 2048 && URL.is_match(value)
}

pub fn is_hex(value: &str) -> bool {
    HEX.is_match(value)
}

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Interpret a value as a point in time, in epoch milliseconds.
///
/// Numbers are epoch milliseconds; strings may be RFC 3339, a plain date, or
/// a date-time without offset (read as UTC).
pub fn parse_date(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            let millis = n.as_f64()?;
            DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.timestamp_millis())
        }
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc().timestamp_millis())
}
