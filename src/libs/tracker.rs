//! The tracking engine.
//!
//! [`Tracker`] is a cloneable handle around one tracking session. It ingests
//! activity notifications, runs the heartbeat that accrues durations and detects
//! inactivity, drives the break cycle and builds reports.
//!
//! ## Serialization
//!
//! Two sources mutate the session: heartbeat ticks and activity notifications,
//! which may arrive from the input listener thread at any rate. Every mutation of
//! the session, the break timer and the history log happens inside one short
//! critical section on a `parking_lot` mutex. Events are broadcast and deferred
//! work is scheduled only after the lock is released, so subscribers and the
//! scheduler can call back into the tracker freely.
//!
//! ## Events
//!
//! Subscribers receive [`TrackerEvent`]s over a broadcast channel. A slow
//! subscriber loses the oldest events instead of slowing the engine down.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use restwatch::libs::config::TrackerConfig;
//! use restwatch::libs::tracker::Tracker;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let tracker = Tracker::system(&TrackerConfig::default())?;
//! let mut events = tracker.subscribe();
//! tracker.start();
//!
//! let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
//! tokio::spawn(tracker.clone().run_heartbeat(stop_rx));
//! # let _ = (events.recv().await, stop_tx.send(()));
//! # Ok(())
//! # }
//! ```

use crate::libs::activity::{ActivitySink, ActivitySource};
use crate::libs::breaks::{BreakCycleId, BreakPhase, BreakTimer};
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::TrackerConfig;
use crate::libs::error::TrackerError;
use crate::libs::history::{ActivityState, HistoryLog, HistorySnapshot};
use crate::libs::report::{Report, SessionTotals};
use crate::libs::scheduler::{ScheduledTask, Scheduler, TokioScheduler};
use crate::libs::session::TrackingSession;
use chrono::{Duration, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use tokio::time::MissedTickBehavior;

const EVENT_CAPACITY: usize = 256;

/// Notifications published by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Fired on every unpaused tick.
    TimeUpdated { active: Duration, inactive: Duration },
    PauseChanged(bool),
    StateChanged { state: ActivityState, at: NaiveDateTime },
    BreakRequired(BreakCycleId),
    BreakFinished(BreakCycleId),
}

/// Point-in-time copy of the tracker's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStatus {
    pub session_start: NaiveDateTime,
    pub active_duration: Duration,
    pub inactive_duration: Duration,
    pub is_paused: bool,
    pub is_inactive: bool,
    pub last_activity: NaiveDateTime,
    pub inactivity_margin: Duration,
    pub break_phase: BreakPhase,
    pub active_since_last_break: Duration,
}

struct State {
    session: TrackingSession,
    breaks: BreakTimer,
}

struct Inner {
    state: Mutex<State>,
    history: HistoryLog,
    tick_interval: Duration,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    events: broadcast::Sender<TrackerEvent>,
    pending_break: Mutex<Option<(BreakCycleId, ScheduledTask)>>,
}

#[derive(Clone)]
pub struct Tracker {
    inner: Arc<Inner>,
}

impl Tracker {
    /// Creates a tracker from a validated configuration and injected collaborators.
    pub fn new(config: &TrackerConfig, clock: Arc<dyn Clock>, scheduler: Arc<dyn Scheduler>) -> Result<Self, TrackerError> {
        let settings = config.settings()?;
        let session = TrackingSession::new(clock.now(), settings.inactivity_margin)?;
        let breaks = if config.breaks_enabled {
            BreakTimer::new(settings.break_threshold, settings.break_duration)?
        } else {
            BreakTimer::disabled()
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State { session, breaks }),
                history: HistoryLog::new(),
                tick_interval: settings.tick_interval,
                clock,
                scheduler,
                events,
                pending_break: Mutex::new(None),
            }),
        })
    }

    /// Creates a tracker on the local wall clock, scheduling on the current tokio runtime.
    pub fn system(config: &TrackerConfig) -> Result<Self, TrackerError> {
        Self::new(config, Arc::new(SystemClock::new()), Arc::new(TokioScheduler::current()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.inner.events.subscribe()
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.tick_interval
    }

    pub fn now(&self) -> NaiveDateTime {
        self.inner.clock.now()
    }

    /// Length of a mandatory break, or `None` when breaks are disabled.
    pub fn break_duration(&self) -> Option<Duration> {
        let state = self.inner.state.lock();
        state.breaks.is_enabled().then(|| state.breaks.break_duration())
    }

    /// Seeds the session as active at the current instant.
    pub fn start(&self) {
        self.register_activity(self.now());
    }

    /// Hands a sink bound to this tracker to an input observation source.
    pub fn attach(&self, source: Box<dyn ActivitySource>) -> Result<(), TrackerError> {
        source.start(ActivitySink::new(self.clone()))
    }

    /// Registers user input observed at `at`.
    pub fn register_activity(&self, at: NaiveDateTime) {
        let transition = {
            let mut state = self.inner.state.lock();
            state.session.register_activity(at).map(|at| {
                let at = self.clamp_to_history(at);
                self.inner.history.append(at, ActivityState::Active);
                at
            })
        };

        if let Some(at) = transition {
            tracing::debug!(%at, "session became active");
            self.emit(TrackerEvent::StateChanged {
                state: ActivityState::Active,
                at,
            });
        }
    }

    /// Runs one heartbeat at the clock's current instant.
    pub fn tick(&self) {
        let now = self.now();
        let (outcome, due_cycle) = {
            let mut state = self.inner.state.lock();
            let Some(outcome) = state.session.tick(now) else {
                return;
            };
            let due_cycle = state.breaks.accrue_active_time(outcome.accrued_active);
            if outcome.became_inactive {
                let at = self.clamp_to_history(now);
                self.inner.history.append(at, ActivityState::Inactive);
            }
            (outcome, due_cycle)
        };

        if outcome.elapsed > self.inner.tick_interval * 2 {
            tracing::debug!(elapsed_ms = outcome.elapsed.num_milliseconds(), "heartbeat ran late");
        }

        self.emit(TrackerEvent::TimeUpdated {
            active: outcome.active_duration,
            inactive: outcome.inactive_duration,
        });

        if outcome.became_inactive {
            tracing::debug!(at = %now, "session became inactive");
            self.emit(TrackerEvent::StateChanged {
                state: ActivityState::Inactive,
                at: now,
            });
        }

        if let Some(id) = due_cycle {
            self.begin_break(id);
        }
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&self) -> bool {
        let now = self.now();
        let paused = self.inner.state.lock().session.toggle_pause(now);
        tracing::debug!(paused, "pause toggled");
        self.emit(TrackerEvent::PauseChanged(paused));
        paused
    }

    /// Changes the inactivity margin; the new value applies from the next tick.
    pub fn set_inactivity_margin(&self, margin: Duration) -> Result<(), TrackerError> {
        self.inner.state.lock().session.set_inactivity_margin(margin)?;
        tracing::debug!(margin_ms = margin.num_milliseconds(), "inactivity margin updated");
        Ok(())
    }

    pub fn status(&self) -> TrackerStatus {
        let state = self.inner.state.lock();
        TrackerStatus {
            session_start: state.session.session_start(),
            active_duration: state.session.active_duration(),
            inactive_duration: state.session.inactive_duration(),
            is_paused: state.session.is_paused(),
            is_inactive: state.session.is_inactive(),
            last_activity: state.session.last_activity(),
            inactivity_margin: state.session.inactivity_margin(),
            break_phase: state.breaks.phase(),
            active_since_last_break: state.breaks.active_since_last_break(),
        }
    }

    pub fn history(&self) -> HistorySnapshot {
        self.inner.history.snapshot()
    }

    /// Builds a report from a consistent copy of the totals and the history.
    pub fn generate_report(&self) -> Report {
        let (totals, history) = {
            let state = self.inner.state.lock();
            let totals = SessionTotals {
                session_start: state.session.session_start(),
                active_duration: state.session.active_duration(),
                inactive_duration: state.session.inactive_duration(),
            };
            (totals, self.inner.history.snapshot())
        };
        Report::build(&totals, &history, self.now())
    }

    /// Drives [`Tracker::tick`] at the configured interval until `shutdown` resolves.
    pub async fn run_heartbeat(self, mut shutdown: oneshot::Receiver<()>) {
        let period = self.inner.tick_interval.to_std().unwrap_or(std::time::Duration::from_millis(100));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => self.tick(),
                _ = &mut shutdown => break,
            }
        }
        tracing::debug!("heartbeat stopped");
    }

    /// The cycle whose completion is scheduled and has not run yet.
    pub fn pending_break(&self) -> Option<BreakCycleId> {
        self.inner.pending_break.lock().as_ref().map(|(id, _)| *id)
    }

    /// Cancels an outstanding break completion.
    pub fn shutdown(&self) {
        if let Some((id, task)) = self.inner.pending_break.lock().take() {
            tracing::debug!(cycle = %id, "cancelling pending break completion");
            task.cancel();
        }
    }

    fn begin_break(&self, id: BreakCycleId) {
        let break_duration = self.inner.state.lock().breaks.break_duration();
        tracing::info!(cycle = %id, "break required");
        self.emit(TrackerEvent::BreakRequired(id));

        let tracker = self.clone();
        let delay = break_duration.to_std().unwrap_or_default();
        let task = self.inner.scheduler.schedule_delayed(delay, Box::new(move || tracker.finish_break(id)));

        // Lock order is pending_break, then state, in both begin and finish. A
        // completion that already ran leaves the timer Running and the task is dropped.
        let mut pending = self.inner.pending_break.lock();
        let mut state = self.inner.state.lock();
        match state.breaks.phase() {
            BreakPhase::BreakPending(current) if current == id => {
                if let Err(e) = state.breaks.start_break(id) {
                    tracing::error!(error = %e, "failed to start break");
                }
                *pending = Some((id, task));
            }
            _ => tracing::debug!(cycle = %id, "break completed before it was recorded as started"),
        }
    }

    fn finish_break(&self, id: BreakCycleId) {
        let result = {
            let mut pending = self.inner.pending_break.lock();
            let result = self.inner.state.lock().breaks.finish_break(id);
            if result.is_ok() && matches!(pending.as_ref(), Some((pending_id, _)) if *pending_id == id) {
                *pending = None;
            }
            result
        };
        match result {
            Ok(()) => {
                tracing::info!(cycle = %id, "break finished");
                self.emit(TrackerEvent::BreakFinished(id));
            }
            Err(e) => tracing::error!(error = %e, "break completion rejected"),
        }
    }

    /// Keeps history timestamps non-decreasing when the clock misbehaves.
    fn clamp_to_history(&self, at: NaiveDateTime) -> NaiveDateTime {
        match self.inner.history.last() {
            Some(last) if last.timestamp > at => last.timestamp,
            _ => at,
        }
    }

    fn emit(&self, event: TrackerEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}
