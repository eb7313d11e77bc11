//! The `watch` command: live activity tracking in the terminal.
//!
//! Starts the tracker with the global input listener and its heartbeat, prints
//! state changes, break notices and a live duration line, and reads short
//! commands from stdin until the user quits or presses Ctrl+C. The final report
//! is printed on exit and exported when an output path was given.

use crate::libs::activity::RdevSource;
use crate::libs::breaks::BreakPhase;
use crate::libs::config::{parse_margin_secs, Config, ExportConfig};
use crate::libs::export::{ExportFormat, Exporter};
use crate::libs::formatter::{format_clock, format_duration};
use crate::libs::history::ActivityState;
use crate::libs::messages::macros::is_debug_mode;
use crate::libs::messages::Message;
use crate::libs::tracker::{Tracker, TrackerEvent};
use crate::libs::view::View;
use crate::{msg_error, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use chrono::{Duration, Local};
use clap::Args;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc, oneshot};

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Inactivity margin in seconds, overriding the configuration
    #[arg(short, long)]
    margin: Option<u64>,

    /// Do not enforce mandatory breaks
    #[arg(long)]
    no_breaks: bool,

    /// Export format used on exit and by the `e` command
    #[arg(short, long, value_enum)]
    format: Option<ExportFormat>,

    /// Export the final report to this file on exit
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// A command typed on stdin while watching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    TogglePause,
    SetMargin(Duration),
    Status,
    Report,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

impl WatchCommand {
    /// Parses one input line. Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<WatchCommand>, Message> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(None);
        };
        let rest = parts.collect::<Vec<_>>().join(" ");

        let command = match head {
            "p" | "pause" => WatchCommand::TogglePause,
            "m" | "margin" => {
                let margin = parse_margin_secs(&rest).map_err(|e| Message::InvalidMargin(e.to_string()))?;
                WatchCommand::SetMargin(margin)
            }
            "s" | "status" => WatchCommand::Status,
            "r" | "report" => WatchCommand::Report,
            "e" | "export" => WatchCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "h" | "help" | "?" => WatchCommand::Help,
            "q" | "quit" | "exit" => WatchCommand::Quit,
            other => return Err(Message::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    let config = Config::read()?;
    let mut tracker_config = config.tracker.clone().unwrap_or_default();
    if let Some(margin) = args.margin {
        tracker_config.inactivity_margin = margin;
    }
    if args.no_breaks {
        tracker_config.breaks_enabled = false;
    }
    let export_config = config.export.clone().unwrap_or_default();
    let format = args.format.unwrap_or(export_config.format);

    let tracker = Tracker::system(&tracker_config)?;
    let printer = tokio::spawn(print_events(tracker.subscribe(), tracker.break_duration()));

    if let Err(e) = tracker.attach(Box::new(RdevSource::new())) {
        msg_error!(Message::ActivityListenerFailed(e.to_string()));
    }
    if tracker_config.seed_active_on_start {
        tracker.start();
    }
    if !tracker_config.breaks_enabled {
        msg_info!(Message::BreaksDisabled);
    }
    msg_info!(Message::TrackerStarted);

    let (stop_tx, stop_rx) = oneshot::channel();
    let heartbeat = tokio::spawn(tracker.clone().run_heartbeat(stop_rx));

    let mut commands = spawn_stdin_reader();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = commands.recv(), if stdin_open => match line {
                Some(line) => {
                    if !handle_line(&tracker, &line, format, &export_config) {
                        break;
                    }
                }
                None => stdin_open = false,
            },
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => msg_info!(Message::WatchReceivedCtrlC),
                    Err(e) => msg_error!(Message::WatchCtrlCListenFailed(e.to_string())),
                }
                break;
            }
        }
    }

    msg_info!(Message::WatchShuttingDown);
    let _ = stop_tx.send(());
    let _ = heartbeat.await;
    tracker.shutdown();
    printer.abort();

    let report = tracker.generate_report();
    msg_print!(Message::ReportHeader(Local::now().format("%B %-d, %Y").to_string()), true);
    View::report(&report)?;
    if args.output.is_some() {
        exporter(format, args.output, &export_config).export(&report)?;
    }

    msg_info!(Message::TrackerStopped);
    Ok(())
}

/// Executes one stdin line. Returns `false` when the user asked to quit.
fn handle_line(tracker: &Tracker, line: &str, format: ExportFormat, export_config: &ExportConfig) -> bool {
    let command = match WatchCommand::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(message) => {
            msg_warning!(message);
            return true;
        }
    };

    match command {
        WatchCommand::TogglePause => {
            tracker.toggle_pause();
        }
        WatchCommand::SetMargin(margin) => match tracker.set_inactivity_margin(margin) {
            Ok(()) => msg_success!(Message::MarginUpdated(margin.num_seconds() as u64)),
            Err(e) => msg_error!(Message::InvalidMargin(e.to_string())),
        },
        WatchCommand::Status => {
            let status = tracker.status();
            let phase = match status.break_phase {
                BreakPhase::Running => "not due".to_string(),
                BreakPhase::BreakPending(id) => format!("{} pending", id),
                BreakPhase::OnBreak(id) => format!("{} in progress", id),
            };
            msg_print!(Message::TrackerStatusLine(
                status.inactivity_margin.num_seconds().to_string(),
                format_duration(&status.active_since_last_break),
                phase
            ));
        }
        WatchCommand::Report => {
            if let Err(e) = View::report(&tracker.generate_report()) {
                msg_error!(Message::ExportFailed(e.to_string()));
            }
        }
        WatchCommand::Export(path) => {
            if let Err(e) = exporter(format, path, export_config).export(&tracker.generate_report()) {
                msg_error!(Message::ExportFailed(e.to_string()));
            }
        }
        WatchCommand::Help => msg_print!(Message::WatchHelp),
        WatchCommand::Quit => return false,
    }
    true
}

fn exporter(format: ExportFormat, path: Option<PathBuf>, export_config: &ExportConfig) -> Exporter {
    match (path, &export_config.directory) {
        (Some(path), _) => Exporter::new(format, Some(path)),
        (None, Some(directory)) => Exporter::in_directory(format, directory),
        (None, None) => Exporter::new(format, None),
    }
}

/// Reads stdin lines on a detached thread so a pending read never holds up shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Limits how often the live duration line is redrawn.
#[derive(Debug, Clone)]
pub struct RefreshThrottle {
    period: std::time::Duration,
    last: Option<Instant>,
}

impl RefreshThrottle {
    pub fn new(period: std::time::Duration) -> Self {
        Self { period, last: None }
    }

    /// Returns `true` when at least one period passed since the last accepted refresh.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

async fn print_events(mut events: broadcast::Receiver<TrackerEvent>, break_duration: Option<Duration>) {
    let live = !is_debug_mode();
    let mut paused = false;
    let mut refresh = RefreshThrottle::new(std::time::Duration::from_secs(1));
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "event printer lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        match event {
            TrackerEvent::TimeUpdated { active, inactive } => {
                if live && refresh.ready(Instant::now()) {
                    print!("\r{}", Message::LiveDurations(format_duration(&active), format_duration(&inactive), paused));
                    let _ = std::io::stdout().flush();
                }
            }
            TrackerEvent::PauseChanged(now_paused) => {
                paused = now_paused;
                if paused {
                    msg_info!(Message::TrackerPaused);
                } else {
                    msg_info!(Message::TrackerResumed);
                }
            }
            TrackerEvent::StateChanged { state, at } => {
                println!();
                match state {
                    ActivityState::Active => msg_print!(Message::BecameActive(format_clock(&at))),
                    ActivityState::Inactive => msg_print!(Message::BecameInactive(format_clock(&at))),
                }
            }
            TrackerEvent::BreakRequired(_) => {
                let duration = break_duration.map(|d| format_duration(&d)).unwrap_or_default();
                println!();
                msg_warning!(Message::BreakRequired(duration), true);
            }
            TrackerEvent::BreakFinished(_) => {
                println!();
                msg_success!(Message::BreakFinished);
            }
        }
    }
}
