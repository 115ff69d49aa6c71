//! Date formatting for rendered reports
//!
//! Breakdown keys stay ISO (`YYYY-MM-DD`) for sorting and export; only
//! the rendered labels use the human-readable form.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse an ISO day key. `None` for anything that is not `YYYY-MM-DD`.
pub fn parse_day(iso_day: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso_day, "%Y-%m-%d").ok()
}

/// Human-readable label for an ISO day key, e.g. `Mar 1, 2024`.
///
/// Unparseable keys are shown as-is rather than dropped.
pub fn format_day_label(iso_day: &str) -> String {
    match parse_day(iso_day) {
        Some(day) => day.format("%b %-d, %Y").to_string(),
        None => iso_day.to_string(),
    }
}

/// Human-readable label for a full timestamp, e.g. `Mar 1, 2024`.
pub fn format_date_label(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}
