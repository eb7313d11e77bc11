//! Mandatory break enforcement.
//!
//! The timer counts active time since the last completed break. Once the count
//! reaches the configured threshold a new break cycle starts and the tracker
//! schedules its completion. Only one cycle can be outstanding at a time: while
//! a cycle is pending or running, further active time does not start another.

use crate::libs::error::TrackerError;
use chrono::Duration;
use std::fmt;

/// Identity of a single break cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreakCycleId(pub u64);

impl fmt::Display for BreakCycleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the timer is within its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakPhase {
    /// Counting active time towards the threshold.
    Running,
    /// Threshold reached, completion not scheduled yet.
    BreakPending(BreakCycleId),
    /// Completion scheduled, waiting for the break to elapse.
    OnBreak(BreakCycleId),
}

#[derive(Debug, Clone)]
pub struct BreakTimer {
    enabled: bool,
    active_threshold: Duration,
    break_duration: Duration,
    active_since_last_break: Duration,
    phase: BreakPhase,
    next_cycle: u64,
}

impl BreakTimer {
    pub fn new(active_threshold: Duration, break_duration: Duration) -> Result<Self, TrackerError> {
        if active_threshold <= Duration::zero() {
            return Err(TrackerError::invalid("break_threshold", active_threshold));
        }
        if break_duration <= Duration::zero() {
            return Err(TrackerError::invalid("break_duration", break_duration));
        }
        Ok(Self {
            enabled: true,
            active_threshold,
            break_duration,
            active_since_last_break: Duration::zero(),
            phase: BreakPhase::Running,
            next_cycle: 1,
        })
    }

    /// A timer that never starts a cycle.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            active_threshold: Duration::MAX,
            break_duration: Duration::zero(),
            active_since_last_break: Duration::zero(),
            phase: BreakPhase::Running,
            next_cycle: 1,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phase(&self) -> BreakPhase {
        self.phase
    }

    pub fn break_duration(&self) -> Duration {
        self.break_duration
    }

    pub fn active_threshold(&self) -> Duration {
        self.active_threshold
    }

    pub fn active_since_last_break(&self) -> Duration {
        self.active_since_last_break
    }

    /// Adds active time and returns the identity of a cycle that just became due.
    ///
    /// Accrual outside of [`BreakPhase::Running`] is ignored: the counter is reset
    /// when the outstanding break completes.
    pub fn accrue_active_time(&mut self, delta: Duration) -> Option<BreakCycleId> {
        if !self.enabled || self.phase != BreakPhase::Running || delta <= Duration::zero() {
            return None;
        }

        self.active_since_last_break += delta;
        if self.active_since_last_break < self.active_threshold {
            return None;
        }

        let id = BreakCycleId(self.next_cycle);
        self.next_cycle += 1;
        self.phase = BreakPhase::BreakPending(id);
        Some(id)
    }

    /// Marks the completion of `id` as scheduled.
    pub fn start_break(&mut self, id: BreakCycleId) -> Result<(), TrackerError> {
        match self.phase {
            BreakPhase::BreakPending(pending) if pending == id => {
                self.phase = BreakPhase::OnBreak(id);
                Ok(())
            }
            other => Err(TrackerError::BreakCycleMismatch {
                expected: Self::outstanding(other),
                found: id,
            }),
        }
    }

    /// Completes cycle `id`, resetting the active counter.
    ///
    /// A completion can arrive before [`BreakTimer::start_break`] was recorded when
    /// the scheduler fires immediately, so a pending cycle is accepted as well.
    pub fn finish_break(&mut self, id: BreakCycleId) -> Result<(), TrackerError> {
        match self.phase {
            BreakPhase::OnBreak(current) | BreakPhase::BreakPending(current) if current == id => {
                self.active_since_last_break = Duration::zero();
                self.phase = BreakPhase::Running;
                Ok(())
            }
            other => Err(TrackerError::BreakCycleMismatch {
                expected: Self::outstanding(other),
                found: id,
            }),
        }
    }

    fn outstanding(phase: BreakPhase) -> Option<BreakCycleId> {
        match phase {
            BreakPhase::Running => None,
            BreakPhase::BreakPending(id) | BreakPhase::OnBreak(id) => Some(id),
        }
    }
}
