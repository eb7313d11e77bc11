/// Every user-facing message printed by restwatch.
///
/// Text lives in the `Display` implementation in `display.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // === TRACKER MESSAGES ===
    TrackerStarted,
    TrackerStopped,
    TrackerPaused,
    TrackerResumed,
    BecameActive(String),   // time
    BecameInactive(String), // time
    LiveDurations(String, String, bool), // active, inactive, paused
    TrackerStatusLine(String, String, String), // margin, active since last break, break phase
    ActivityListenerFailed(String),
    WatchShuttingDown,
    WatchReceivedCtrlC,
    WatchCtrlCListenFailed(String),

    // === BREAK MESSAGES ===
    BreakRequired(String), // break duration
    BreakFinished,
    BreaksDisabled,

    // === COMMAND MESSAGES ===
    WatchHelp,
    UnknownCommand(String),
    MarginUpdated(u64),
    InvalidMargin(String),

    // === REPORT MESSAGES ===
    ReportHeader(String), // date
    ExportCompleted(String),
    ExportFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleTracker,
    ConfigModuleExport,
    ConfigInvalid(String),

    // === PROMPTS ===
    PromptSelectModules,
    PromptInactivityMargin,
    PromptTickInterval,
    PromptBreaksEnabled,
    PromptBreakThreshold,
    PromptBreakDuration,
    PromptSeedActive,
    PromptExportFormat,
    PromptExportDirectory,
    ValueMustBePositive,
}
