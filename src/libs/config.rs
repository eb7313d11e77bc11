//! Configuration management for restwatch.
//!
//! Settings live in a JSON file inside the platform data directory resolved by
//! [`DataStorage`]. A missing file is not an error: every module falls back to
//! its defaults, so the tracker runs without any setup.
//!
//! ## Configuration Structure
//!
//! - **Tracker Config**: inactivity margin, heartbeat interval and break cycle
//! - **Export Config**: default report format and destination directory
//!
//! Both modules are optional in the file and can be edited through the
//! interactive wizard run by `restwatch init`.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use restwatch::libs::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::read()?;
//! let tracker = config.tracker.unwrap_or_default();
//! println!("Inactivity margin: {}s", tracker.inactivity_margin);
//! # Ok(())
//! # }
//! ```

use super::data_storage::DataStorage;
use crate::libs::error::TrackerError;
use crate::libs::export::ExportFormat;
use crate::libs::messages::Message;
use crate::libs::session::DEFAULT_INACTIVITY_MARGIN;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use chrono::Duration;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the application.
///
/// Used by the setup wizard to list the modules a user can edit.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Activity tracker configuration settings.
///
/// All values are stored as whole numbers in the unit named on each field so the
/// file stays easy to edit by hand. Use [`TrackerConfig::settings`] to turn them
/// into validated durations.
///
/// ## Timing Configuration
///
/// - **Inactivity margin**: how long input may be absent before the session is
///   classified inactive
/// - **Tick interval**: heartbeat period driving accrual and inactivity checks
/// - **Break threshold / duration**: active time after which a break is enforced,
///   and how long that break lasts
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Seconds without input before the session becomes inactive.
    pub inactivity_margin: u64,

    /// Heartbeat period in milliseconds.
    ///
    /// Inactivity is detected at most one tick after the margin is exceeded.
    pub tick_interval: u64,

    /// Whether the mandatory break cycle is enforced at all.
    pub breaks_enabled: bool,

    /// Seconds of accumulated active time after which a break is required.
    pub break_threshold: u64,

    /// Length of a mandatory break in seconds.
    pub break_duration: u64,

    /// Register one activity when tracking starts so the session begins active.
    pub seed_active_on_start: bool,
}

/// Validated durations derived from a [`TrackerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    pub inactivity_margin: Duration,
    pub tick_interval: Duration,
    pub break_threshold: Duration,
    pub break_duration: Duration,
}

/// Default report export settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExportConfig {
    /// Format used when none is given on the command line.
    pub format: ExportFormat,

    /// Directory receiving exports without an explicit output path.
    ///
    /// The current working directory is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Main configuration container.
///
/// Every module is optional so the file only carries what the user changed.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportConfig>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            inactivity_margin: DEFAULT_INACTIVITY_MARGIN as u64,
            tick_interval: 100,
            breaks_enabled: true,
            break_threshold: 50 * 60,
            break_duration: 10 * 60,
            seed_active_on_start: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            format: ExportFormat::Json,
            directory: None,
        }
    }
}

impl TrackerConfig {
    /// Converts the stored values into durations, rejecting zero or overflowing values.
    ///
    /// Break settings are only checked when breaks are enabled.
    pub fn settings(&self) -> Result<TrackerSettings, TrackerError> {
        let inactivity_margin = seconds("inactivity_margin", self.inactivity_margin)?;
        let tick_interval = positive("tick_interval", self.tick_interval, Duration::try_milliseconds)?;
        let (break_threshold, break_duration) = if self.breaks_enabled {
            (
                seconds("break_threshold", self.break_threshold)?,
                seconds("break_duration", self.break_duration)?,
            )
        } else {
            (Duration::zero(), Duration::zero())
        };

        Ok(TrackerSettings {
            inactivity_margin,
            tick_interval,
            break_threshold,
            break_duration,
        })
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        self.settings().map(|_| ())
    }

    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "tracker".to_string(),
            name: "Tracker".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "export".to_string(),
            name: "Export".to_string(),
        }
    }
}

/// Converts a whole number of seconds into a positive duration.
pub fn seconds(name: &'static str, value: u64) -> Result<Duration, TrackerError> {
    positive(name, value, Duration::try_seconds)
}

fn positive(name: &'static str, value: u64, convert: fn(i64) -> Option<Duration>) -> Result<Duration, TrackerError> {
    if value == 0 {
        return Err(TrackerError::invalid(name, value));
    }
    i64::try_from(value)
        .ok()
        .and_then(convert)
        .ok_or_else(|| TrackerError::invalid(name, value))
}

/// Parses an inactivity margin typed by the user as whole seconds.
///
/// Only digits are accepted and the value must be positive.
pub fn parse_margin_secs(input: &str) -> Result<Duration, TrackerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(TrackerError::invalid("inactivity_margin", trimmed));
    }
    let value: u64 = trimmed.parse().map_err(|_| TrackerError::invalid("inactivity_margin", trimmed))?;
    seconds("inactivity_margin", value)
}

impl Config {
    /// Reads the configuration file, or returns defaults when it does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        if let Some(tracker) = &config.tracker {
            tracker
                .validate()
                .map_err(|e| msg_error_anyhow!(Message::ConfigInvalid(e.to_string())))?;
        }
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        if let Some(tracker) = &self.tracker {
            tracker.validate()?;
        }
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns whether a file was removed.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Runs the interactive setup wizard, starting from the current configuration.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![TrackerConfig::module(), ExportConfig::module()];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "tracker" => {
                    let default = config.tracker.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleTracker);
                    let tracker = TrackerConfig {
                        inactivity_margin: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptInactivityMargin.to_string())
                            .default(default.inactivity_margin)
                            .validate_with(|value: &u64| positive_input(*value))
                            .interact_text()?,
                        tick_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptTickInterval.to_string())
                            .default(default.tick_interval)
                            .validate_with(|value: &u64| positive_input(*value))
                            .interact_text()?,
                        breaks_enabled: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBreaksEnabled.to_string())
                            .default(default.breaks_enabled)
                            .interact()?,
                        break_threshold: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBreakThreshold.to_string())
                            .default(default.break_threshold)
                            .validate_with(|value: &u64| positive_input(*value))
                            .interact_text()?,
                        break_duration: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBreakDuration.to_string())
                            .default(default.break_duration)
                            .validate_with(|value: &u64| positive_input(*value))
                            .interact_text()?,
                        seed_active_on_start: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSeedActive.to_string())
                            .default(default.seed_active_on_start)
                            .interact()?,
                    };
                    tracker.validate()?;
                    config.tracker = Some(tracker);
                }
                "export" => {
                    let default = config.export.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleExport);
                    let formats = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Excel];
                    let current = formats.iter().position(|f| *f == default.format).unwrap_or(1);
                    let format_index = Select::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptExportFormat.to_string())
                        .items(&formats.iter().map(|f| f.extension()).collect::<Vec<_>>())
                        .default(current)
                        .interact()?;
                    let directory: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptExportDirectory.to_string())
                        .default(default.directory.map(|d| d.display().to_string()).unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.export = Some(ExportConfig {
                        format: formats[format_index],
                        directory: (!directory.trim().is_empty()).then(|| PathBuf::from(directory.trim())),
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

fn positive_input(value: u64) -> Result<(), String> {
    if value == 0 {
        Err(Message::ValueMustBePositive.to_string())
    } else {
        Ok(())
    }
}
