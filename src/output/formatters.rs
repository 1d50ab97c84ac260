//! Reusable formatting utilities for CLI output
//!
//! Small value formatters shared by the table, pretty and CSV renderers.

use chrono::{DateTime, Utc};

/// Format a percentage with one decimal place, e.g. `87.5%`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// `Yes`/`No` for boolean report columns.
pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Format an optional timestamp as RFC 3339 (seconds precision).
///
/// Returns an empty string when the timestamp is absent.
pub fn format_timestamp(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp
        .map(|ts| ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Format the time between two instants to a human-readable string.
///
/// # Example output
/// - `1m 05s`
/// - `850ms`
pub fn format_elapsed(started: &DateTime<Utc>, completed: Option<&DateTime<Utc>>) -> String {
    let Some(completed) = completed else {
        return "N/A".to_string();
    };

    let millis = (*completed - *started).num_milliseconds().max(0);
    if millis < 1000 {
        return format!("{}ms", millis);
    }

    let secs = millis / 1000;
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Pluralize a count: `1 region`, `3 regions`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
