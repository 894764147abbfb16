//! Human-readable timestamps.

use chrono::{DateTime, Local, Utc};

/// Long form used in headers: `Monday, January 2, 2006 at 15:04`.
pub const LONG_FORMAT: &str = "%A, %B %-d, %Y at %H:%M";

/// Calendar date used once an article is a week old: `January 2, 2006`.
pub const DATE_FORMAT: &str = "%B %-d, %Y";

pub fn format_long(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(LONG_FORMAT).to_string()
}

pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

/// Relative age of `published` as seen from `now`.
///
/// Timestamps in the future count as "just now".
pub fn format_time_ago(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);

    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = elapsed.num_days();
    if days < 7 {
        return plural(days, "day");
    }

    format_date(published)
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
