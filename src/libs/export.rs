//! Report export to files.
//!
//! Turns a [`Report`] into a CSV, JSON or Excel file. All formats share the
//! same layout: a summary block (session start and end, active and inactive
//! totals, activity share) followed by the compacted state intervals.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use restwatch::libs::export::{ExportFormat, Exporter};
//! # use restwatch::libs::report::Report;
//! # fn run(report: &Report) -> anyhow::Result<()> {
//! let exporter = Exporter::new(ExportFormat::Csv, None);
//! let path = exporter.export(report)?;
//! println!("written to {}", path.display());
//! # Ok(())
//! # }
//! ```

use crate::libs::formatter::{format_duration, format_timestamp, FormattedInterval};
use crate::libs::messages::Message;
use crate::libs::report::Report;
use crate::msg_success;
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Supported export output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values, one section per block.
    Csv,
    /// Pretty-printed JSON mirroring [`ExportReport`].
    Json,
    /// Excel workbook with a single formatted worksheet.
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// Serializable, display-ready form of a session report.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportReport {
    /// Session start as `YYYY-MM-DD HH:MM:SS`
    pub session_start: String,
    /// Report generation time as `YYYY-MM-DD HH:MM:SS`
    pub session_end: String,
    /// Total active time as `HH:MM:SS.mmm`
    pub active_time: String,
    /// Total inactive time as `HH:MM:SS.mmm`
    pub inactive_time: String,
    /// Share of tracked time spent active, one decimal place
    pub activity_percentage: f64,
    /// Compacted state intervals in chronological order
    pub intervals: Vec<FormattedInterval>,
}

impl From<&Report> for ExportReport {
    fn from(report: &Report) -> Self {
        ExportReport {
            session_start: format_timestamp(&report.session_start),
            session_end: format_timestamp(&report.session_end),
            active_time: format_duration(&report.active_duration),
            inactive_time: format_duration(&report.inactive_duration),
            activity_percentage: report.activity_percentage(),
            intervals: FormattedInterval::from_intervals(&report.intervals),
        }
    }
}

/// Writes reports in one format to one destination.
pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Creates an exporter; without an explicit path the file is named
    /// `restwatch_<YYYYMMDD_HHMMSS>.<ext>` in the current directory.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(Self::default_file_name(format)));
        Self { format, output_path }
    }

    /// Like [`Exporter::new`], placing the default file name inside `directory`.
    pub fn in_directory(format: ExportFormat, directory: &Path) -> Self {
        Self {
            format,
            output_path: directory.join(Self::default_file_name(format)),
        }
    }

    pub fn default_file_name(format: ExportFormat) -> String {
        format!("restwatch_{}.{}", Local::now().format("%Y%m%d_%H%M%S"), format.extension())
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes `report` and returns the path of the created file.
    pub fn export(&self, report: &Report) -> Result<PathBuf> {
        let export_report = ExportReport::from(report);

        match self.format {
            ExportFormat::Csv => self.export_report_csv(&export_report)?,
            ExportFormat::Json => self.export_report_json(&export_report)?,
            ExportFormat::Excel => self.export_report_excel(&export_report)?,
        }

        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(self.output_path.clone())
    }

    fn export_report_csv(&self, report: &ExportReport) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;

        wtr.write_record(["SUMMARY", "", "", "", ""])?;
        wtr.write_record(["Session Start", report.session_start.as_str(), "", "", ""])?;
        wtr.write_record(["Session End", report.session_end.as_str(), "", "", ""])?;
        wtr.write_record(["Active Time", report.active_time.as_str(), "", "", ""])?;
        wtr.write_record(["Inactive Time", report.inactive_time.as_str(), "", "", ""])?;
        wtr.write_record(["Activity", format!("{:.1}%", report.activity_percentage).as_str(), "", "", ""])?;

        wtr.write_record(["", "", "", "", ""])?;
        wtr.write_record(["STATE INTERVALS", "", "", "", ""])?;
        wtr.write_record(["Index", "Start", "End", "State", "Duration"])?;
        for interval in &report.intervals {
            wtr.write_record([
                interval.id.to_string(),
                interval.start.clone(),
                interval.end.clone(),
                interval.state.clone(),
                interval.duration.clone(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn export_report_json(&self, report: &ExportReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn export_report_excel(&self, report: &ExportReport) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let header_format = Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray);
        let title_format = Format::new().set_bold().set_font_size(14.0);

        worksheet.write_string_with_format(0, 0, "Activity Report", &title_format)?;

        let summary = [
            ("Session Start", report.session_start.clone()),
            ("Session End", report.session_end.clone()),
            ("Active Time", report.active_time.clone()),
            ("Inactive Time", report.inactive_time.clone()),
            ("Activity", format!("{:.1}%", report.activity_percentage)),
        ];
        let mut row = 2;
        for (label, value) in &summary {
            worksheet.write_string_with_format(row, 0, *label, &header_format)?;
            worksheet.write_string(row, 1, value)?;
            row += 1;
        }

        row += 1;
        for (col, header) in ["Index", "Start", "End", "State", "Duration"].iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, *header, &header_format)?;
        }
        row += 1;
        for interval in &report.intervals {
            worksheet.write_number(row, 0, interval.id as f64)?;
            worksheet.write_string(row, 1, &interval.start)?;
            worksheet.write_string(row, 2, &interval.end)?;
            worksheet.write_string(row, 3, &interval.state)?;
            worksheet.write_string(row, 4, &interval.duration)?;
            row += 1;
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}
