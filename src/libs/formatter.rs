//! Parsing and formatting helpers shared by the CLI, the views and the exporters.
//!
//! ## Relative dates
//!
//! Date arguments accept a few keywords besides ISO dates:
//!
//! - `today`, `tomorrow`, `yesterday`
//! - `YYYY-MM-DD`
//!
//! Keywords are resolved against an explicit "today" so parsing stays
//! deterministic in tests.
//!
//! ## Relative timestamps
//!
//! [`time_ago`] renders the dashboard activity feed labels:
//!
//! - under a minute → "just now"
//! - under an hour → "5 min ago"
//! - under a day → "3 h ago"
//! - otherwise → "2 d ago"
//!
//! ```rust
//! use chrono::NaiveDate;
//! use worksuite::libs::formatter::{parse_date, split_list};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
//! assert_eq!(parse_date("tomorrow", today)?, NaiveDate::from_ymd_opt(2024, 5, 11).unwrap());
//! assert_eq!(split_list(" ops, infra ,,"), vec!["ops", "infra"]);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::error::StoreError;
use anyhow::Result;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a date argument, see the module docs for accepted forms.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    let parsed = match input.to_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => NaiveDate::parse_from_str(input, DATE_FORMAT).ok(),
    };
    parsed.ok_or_else(|| StoreError::invalid(format!("'{}' is not a date (use YYYY-MM-DD, today, tomorrow or yesterday)", input)).into())
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| StoreError::invalid(format!("'{}' is not a time (use HH:MM)", input)).into())
}

/// Splits a comma separated list, trimming entries and dropping blanks.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_else(|| "-".to_string())
}

/// Time of `at` truncated to the minute.
pub fn to_minute(at: NaiveDateTime) -> NaiveTime {
    NaiveTime::from_hms_opt(at.hour(), at.minute(), 0).unwrap_or(at.time())
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Relative label for `at` as seen from `now`. Future timestamps read "just now".
pub fn time_ago(at: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if elapsed.num_hours() < 24 {
        format!("{} h ago", elapsed.num_hours())
    } else {
        format!("{} d ago", elapsed.num_days())
    }
}

/// Cuts `text` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
