//! Display implementation for restwatch messages.
//!
//! All user-facing text is defined here, in one place, so wording stays
//! consistent between the watch loop, the setup wizard and the exporter.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let text = match self {
            // === TRACKER MESSAGES ===
            Message::TrackerStarted => "Tracking activity. Type 'h' and Enter for commands.".to_string(),
            Message::TrackerStopped => "Tracking stopped".to_string(),
            Message::TrackerPaused => "Tracking paused".to_string(),
            Message::TrackerResumed => "Tracking resumed".to_string(),
            Message::BecameActive(time) => format!("🟢 Active since {}", time),
            Message::BecameInactive(time) => format!("💤 Inactive since {}", time),
            Message::LiveDurations(active, inactive, paused) => {
                let marker = if *paused { "⏸️ paused" } else { "▶️ running" };
                format!("🟢 Active: {}  💤 Inactive: {}  {}", active, inactive, marker)
            }
            Message::TrackerStatusLine(margin, since_break, phase) => {
                format!("Margin: {}s, active since last break: {}, break: {}", margin, since_break, phase)
            }
            Message::ActivityListenerFailed(error) => format!("Failed to start the input listener: {}", error),
            Message::WatchShuttingDown => "Shutting down...".to_string(),
            Message::WatchReceivedCtrlC => "Received Ctrl+C".to_string(),
            Message::WatchCtrlCListenFailed(error) => format!("Unable to listen for Ctrl+C: {}", error),

            // === BREAK MESSAGES ===
            Message::BreakRequired(duration) => format!("Time for a break! Step away for {}", duration),
            Message::BreakFinished => "Break finished, welcome back".to_string(),
            Message::BreaksDisabled => "Mandatory breaks are disabled".to_string(),

            // === COMMAND MESSAGES ===
            Message::WatchHelp => [
                "Commands:",
                "  p         pause / resume",
                "  m <secs>  set the inactivity margin",
                "  s         show status",
                "  r         print the report",
                "  e [path]  export the report",
                "  q         quit",
            ]
            .join("\n"),
            Message::UnknownCommand(input) => format!("Unknown command '{}'. Type 'h' for help.", input),
            Message::MarginUpdated(secs) => format!("Inactivity margin updated to {} seconds", secs),
            Message::InvalidMargin(error) => format!("Invalid inactivity margin: {}", error),

            // === REPORT MESSAGES ===
            Message::ReportHeader(date) => format!("Activity report for {}", date),
            Message::ExportCompleted(path) => format!("Report exported to {}", path),
            Message::ExportFailed(error) => format!("Export failed: {}", error),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigNotFound => "No configuration file to remove".to_string(),
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::ConfigModuleExport => "Export settings".to_string(),
            Message::ConfigInvalid(error) => format!("Invalid configuration: {}", error),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptInactivityMargin => "Enter inactivity margin (seconds)".to_string(),
            Message::PromptTickInterval => "Enter tick interval (milliseconds)".to_string(),
            Message::PromptBreaksEnabled => "Enforce mandatory breaks?".to_string(),
            Message::PromptBreakThreshold => "Enter active time before a break (seconds)".to_string(),
            Message::PromptBreakDuration => "Enter break duration (seconds)".to_string(),
            Message::PromptSeedActive => "Start every session as active?".to_string(),
            Message::PromptExportFormat => "Select default export format".to_string(),
            Message::PromptExportDirectory => "Enter export directory (empty for current directory)".to_string(),
            Message::ValueMustBePositive => "Value must be greater than zero".to_string(),
        };

        write!(f, "{}", text)
    }
}
