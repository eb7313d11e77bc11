//! Error types raised by the tracking engine.
//!
//! The engine reports configuration mistakes synchronously to the caller and
//! leaves its state untouched. Break cycle mismatches indicate a programming
//! error in the wiring around the engine and are never expected at runtime.

use crate::libs::breaks::BreakCycleId;
use thiserror::Error;

/// Errors produced by the tracker and its components.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// A duration setting was zero, negative or too large to represent.
    #[error("invalid value for {name}: {value} (must be a positive duration)")]
    InvalidSetting { name: &'static str, value: String },

    /// A break completion arrived for a cycle that is not the outstanding one.
    #[error("break cycle mismatch: expected {expected:?}, found {found}")]
    BreakCycleMismatch { expected: Option<BreakCycleId>, found: BreakCycleId },

    /// The input observation source could not be started.
    #[error("activity source failed: {0}")]
    ActivitySource(String),
}

impl TrackerError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString) -> Self {
        TrackerError::InvalidSetting { name, value: value.to_string() }
    }
}
