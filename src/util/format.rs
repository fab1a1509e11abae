//! Display formatting for timestamps and counters.

use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};

/// Pattern used for post timestamps.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

/// Render `value` using the `YYYY MM DD HH mm ss` tokens. Each token is
/// substituted once, in that order; anything else is copied verbatim.
pub fn format_date(value: &NaiveDateTime, pattern: &str) -> String {
    pattern
        .replacen("YYYY", &value.year().to_string(), 1)
        .replacen("MM", &format!("{:02}", value.month()), 1)
        .replacen("DD", &format!("{:02}", value.day()), 1)
        .replacen("HH", &format!("{:02}", value.hour()), 1)
        .replacen("mm", &format!("{:02}", value.minute()), 1)
        .replacen("ss", &format!("{:02}", value.second()), 1)
}

/// Parse a server timestamp. Offset-carrying values are converted to local
/// time; naive values are taken as-is.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Compact counter: `999`, `1.2k`, `12k`, `123k`.
pub fn format_number(value: u64) -> String {
    if value >= 10_000 {
        return format!("{}k", value / 1000);
    }
    if value >= 1000 {
        return format!("{:.1}k", value as f64 / 1000.0);
    }
    value.to_string()
}
