//! Session report construction.
//!
//! A report carries the session totals and the transition history compacted
//! into contiguous intervals. Rendering it (terminal table, CSV, JSON, Excel or
//! anything else) is left to the consumers of [`Report`].

use crate::libs::history::{ActivityState, StateRecord};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A run of identical states between two recorded instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactedInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub state: ActivityState,
}

impl CompactedInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Totals copied out of a session at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTotals {
    pub session_start: NaiveDateTime,
    pub active_duration: Duration,
    pub inactive_duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub session_start: NaiveDateTime,
    pub session_end: NaiveDateTime,
    #[serde(with = "duration_millis")]
    pub active_duration: Duration,
    #[serde(with = "duration_millis")]
    pub inactive_duration: Duration,
    pub intervals: Vec<CompactedInterval>,
}

impl Report {
    /// Builds a report from session totals and a history prefix.
    ///
    /// `generated_at` becomes the session end; it is not derived from the log.
    pub fn build(totals: &SessionTotals, records: &[StateRecord], generated_at: NaiveDateTime) -> Self {
        Report {
            session_start: totals.session_start,
            session_end: generated_at,
            active_duration: totals.active_duration,
            inactive_duration: totals.inactive_duration,
            intervals: compact(records),
        }
    }

    /// Share of tracked time spent active, in percent with one decimal.
    pub fn activity_percentage(&self) -> f64 {
        let total = (self.active_duration + self.inactive_duration).num_milliseconds();
        if total <= 0 {
            return 0.0;
        }
        let percentage = self.active_duration.num_milliseconds() as f64 / total as f64 * 100.0;
        (percentage * 10.0).round() / 10.0
    }
}

/// Run-length compacts consecutive records of the same state.
///
/// An interval closed by a state change ends at the previous record; the last
/// record always closes the open interval at its own timestamp, even when its
/// state differs.
pub fn compact(records: &[StateRecord]) -> Vec<CompactedInterval> {
    let mut intervals = vec![];
    let Some(first) = records.first() else {
        return intervals;
    };

    let mut current_start = first.timestamp;
    let mut current_state = first.state;
    let last_index = records.len() - 1;

    for (i, record) in records.iter().enumerate() {
        let changed = record.state != current_state;
        let last = i == last_index;

        if changed || last {
            let end = if last { record.timestamp } else { records[i - 1].timestamp };
            intervals.push(CompactedInterval {
                start: current_start,
                end,
                state: current_state,
            });
            current_start = record.timestamp;
            current_state = record.state;
        }
    }

    intervals
}

mod duration_millis {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        Duration::try_milliseconds(millis).ok_or_else(|| serde::de::Error::custom("duration out of range"))
    }
}
