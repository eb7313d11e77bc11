use crate::libs::formatter::{format_duration, format_timestamp, FormattedInterval};
use crate::libs::report::Report;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints the session totals followed by the compacted intervals.
    pub fn report(report: &Report) -> Result<()> {
        let mut summary = Table::new();
        summary.add_row(row!["Session start", format_timestamp(&report.session_start)]);
        summary.add_row(row!["Session end", format_timestamp(&report.session_end)]);
        summary.add_row(row!["Active time", format_duration(&report.active_duration)]);
        summary.add_row(row!["Inactive time", format_duration(&report.inactive_duration)]);
        summary.add_row(row!["Activity", format!("{:.1}%", report.activity_percentage())]);
        summary.printstd();

        if report.intervals.is_empty() {
            return Ok(());
        }

        View::intervals(&FormattedInterval::from_intervals(&report.intervals))
    }

    pub fn intervals(intervals: &[FormattedInterval]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "START", "END", "STATE", "DURATION"]);
        for interval in intervals {
            table.add_row(row![interval.id, interval.start, interval.end, interval.state, interval.duration]);
        }
        table.printstd();

        Ok(())
    }
}
