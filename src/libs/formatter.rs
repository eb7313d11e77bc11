//! Duration and time formatting for display and export.
//!
//! ## Format Specifications
//!
//! - Durations use `HH:MM:SS.mmm`; hours grow past two digits when needed and
//!   negative durations are shown as zero.
//! - Interval bounds use the wall-clock time `HH:MM:SS`.
//!
//! ## Examples
//!
//! ```rust
//! use restwatch::libs::formatter::format_duration;
//! use chrono::Duration;
//!
//! let duration = Duration::minutes(90) + Duration::milliseconds(250);
//! assert_eq!(format_duration(&duration), "01:30:00.250");
//! ```

use crate::libs::report::CompactedInterval;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A compacted interval with every field rendered as text.
///
/// Suitable for tables and flat export formats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormattedInterval {
    /// 1-based position of the interval in the report.
    pub id: usize,
    /// Interval start as `HH:MM:SS`.
    pub start: String,
    /// Interval end as `HH:MM:SS`.
    pub end: String,
    /// `Active` or `Inactive`.
    pub state: String,
    /// Interval length as `HH:MM:SS.mmm`.
    pub duration: String,
}

impl FormattedInterval {
    pub fn from_intervals(intervals: &[CompactedInterval]) -> Vec<FormattedInterval> {
        intervals
            .iter()
            .enumerate()
            .map(|(index, interval)| FormattedInterval {
                id: index + 1,
                start: format_clock(&interval.start),
                end: format_clock(&interval.end),
                state: interval.state.to_string(),
                duration: format_duration(&interval.duration()),
            })
            .collect()
    }
}

/// Formats a duration as `HH:MM:SS.mmm`, clamping negative values to zero.
pub fn format_duration(duration: &Duration) -> String {
    let total_millis = duration.num_milliseconds().max(0);
    let hours = total_millis / 3_600_000;
    let mins = total_millis / 60_000 % 60;
    let secs = total_millis / 1_000 % 60;
    let millis = total_millis % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

/// Formats the time of day of `instant` as `HH:MM:SS`.
pub fn format_clock(instant: &NaiveDateTime) -> String {
    instant.format("%H:%M:%S").to_string()
}

/// Formats a full timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(instant: &NaiveDateTime) -> String {
    instant.format("%Y-%m-%d %H:%M:%S").to_string()
}
