//! The activity/inactivity state machine of a tracking session.
//!
//! A session is either active or inactive, and independently paused or not.
//! Durations only grow on heartbeat ticks of an unpaused session, and exactly
//! one of the two buckets grows per tick. A tick adds the clock time elapsed
//! since the previous tick, so a late or stalled heartbeat loses nothing, and
//! paused time is never counted. The switch to inactive happens only
//! on a tick whose instant lies strictly more than the inactivity margin after
//! the last activity; the switch back to active happens as soon as activity is
//! registered.
//!
//! The session itself is plain data with no locking. The tracker owns it behind
//! its lock and turns the returned outcomes into history records and events.

use crate::libs::error::TrackerError;
use chrono::{Duration, NaiveDateTime};

/// Default inactivity margin in seconds.
pub const DEFAULT_INACTIVITY_MARGIN: i64 = 10;

/// Result of a heartbeat tick on an unpaused session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub active_duration: Duration,
    pub inactive_duration: Duration,
    /// Clock time covered by this tick.
    pub elapsed: Duration,
    /// Amount added to the active bucket by this tick, zero if the tick was inactive.
    pub accrued_active: Duration,
    /// Set when this tick moved the session to inactive.
    pub became_inactive: bool,
}

#[derive(Debug, Clone)]
pub struct TrackingSession {
    session_start: NaiveDateTime,
    active_duration: Duration,
    inactive_duration: Duration,
    is_paused: bool,
    is_inactive: bool,
    has_activity: bool,
    last_activity: NaiveDateTime,
    last_tick: NaiveDateTime,
    paused_at: Option<NaiveDateTime>,
    inactivity_margin: Duration,
}

impl TrackingSession {
    pub fn new(session_start: NaiveDateTime, inactivity_margin: Duration) -> Result<Self, TrackerError> {
        validate_margin(inactivity_margin)?;
        Ok(Self {
            session_start,
            active_duration: Duration::zero(),
            inactive_duration: Duration::zero(),
            is_paused: false,
            is_inactive: false,
            has_activity: false,
            last_activity: session_start,
            last_tick: session_start,
            paused_at: None,
            inactivity_margin,
        })
    }

    pub fn session_start(&self) -> NaiveDateTime {
        self.session_start
    }

    pub fn active_duration(&self) -> Duration {
        self.active_duration
    }

    pub fn inactive_duration(&self) -> Duration {
        self.inactive_duration
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_inactive(&self) -> bool {
        self.is_inactive
    }

    pub fn last_activity(&self) -> NaiveDateTime {
        self.last_activity
    }

    pub fn inactivity_margin(&self) -> Duration {
        self.inactivity_margin
    }

    /// Advances the session to `now`, accruing the time since the previous tick.
    ///
    /// Returns `None` when paused: nothing accrues and the margin is not evaluated.
    /// A clock that went backward accrues nothing.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<TickOutcome> {
        if self.is_paused {
            return None;
        }

        let elapsed = (now - self.last_tick).max(Duration::zero());
        self.last_tick = now;

        let accrued_active = if self.is_inactive {
            self.inactive_duration += elapsed;
            Duration::zero()
        } else {
            self.active_duration += elapsed;
            elapsed
        };

        let became_inactive = !self.is_inactive && now - self.last_activity > self.inactivity_margin;
        if became_inactive {
            self.is_inactive = true;
        }

        Some(TickOutcome {
            elapsed,
            active_duration: self.active_duration,
            inactive_duration: self.inactive_duration,
            accrued_active,
            became_inactive,
        })
    }

    /// Normalizes an activity notification.
    ///
    /// Returns the instant of an `Active` transition if this notification caused
    /// one: either the session was inactive, or this is the first activity seen.
    /// The tracked last activity never moves backward, and a paused session only
    /// records the instant.
    pub fn register_activity(&mut self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        if at > self.last_activity {
            self.last_activity = at;
        } else if at < self.last_activity {
            tracing::warn!(%at, last_activity = %self.last_activity, "activity timestamp precedes last activity");
        }

        if self.is_paused {
            return None;
        }

        if self.is_inactive || !self.has_activity {
            self.is_inactive = false;
            self.has_activity = true;
            return Some(self.last_activity);
        }

        None
    }

    /// Flips the pause flag at `now` and returns the new value.
    ///
    /// On resume the tick baseline moves forward by the paused span, so the next
    /// tick still counts the unpaused time before the pause and nothing after it.
    pub fn toggle_pause(&mut self, now: NaiveDateTime) -> bool {
        self.is_paused = !self.is_paused;
        if self.is_paused {
            self.paused_at = Some(now);
        } else if let Some(paused_at) = self.paused_at.take() {
            self.last_tick += (now - paused_at).max(Duration::zero());
        }
        self.is_paused
    }

    pub fn set_inactivity_margin(&mut self, margin: Duration) -> Result<(), TrackerError> {
        validate_margin(margin)?;
        self.inactivity_margin = margin;
        Ok(())
    }
}

fn validate_margin(margin: Duration) -> Result<(), TrackerError> {
    if margin <= Duration::zero() {
        return Err(TrackerError::invalid("inactivity_margin", margin));
    }
    Ok(())
}
