//! Input observation sources.
//!
//! The tracker does not know how user input is observed. A source implements
//! [`ActivitySource`] and pushes the instant of every observed input into the
//! [`ActivitySink`] it is started with. The sink is free to be called from any
//! thread and at any rate; pause handling and state normalization happen inside
//! the tracker.
//!
//! Two sources ship with the crate:
//!
//! - [`RdevSource`] listens to global keyboard, mouse and wheel events through
//!   `rdev` on a dedicated thread and restarts the listener when it fails.
//! - [`ChannelSource`] forwards instants sent through an [`ActivityFeed`], for
//!   simulations, scripted sessions and tests.

use crate::libs::error::TrackerError;
use crate::libs::tracker::Tracker;
use chrono::NaiveDateTime;
use rdev::{listen, Event, EventType};
use std::time::Duration;
use tokio::sync::mpsc;

/// Receives activity notifications on behalf of a tracker.
#[derive(Clone)]
pub struct ActivitySink {
    tracker: Tracker,
}

impl ActivitySink {
    pub(crate) fn new(tracker: Tracker) -> Self {
        Self { tracker }
    }

    /// Reports input observed at `at`.
    pub fn observe(&self, at: NaiveDateTime) {
        self.tracker.register_activity(at);
    }

    /// Reports input observed now, according to the tracker's clock.
    pub fn observe_now(&self) {
        self.tracker.register_activity(self.tracker.now());
    }
}

/// An injected capability that observes user input.
pub trait ActivitySource: Send {
    fn start(self: Box<Self>, sink: ActivitySink) -> Result<(), TrackerError>;
}

/// Global keyboard and mouse listener.
#[derive(Debug, Clone)]
pub struct RdevSource {
    retry_delay: Duration,
}

impl Default for RdevSource {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RdevSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_input(event_type: &EventType) -> bool {
        matches!(
            event_type,
            EventType::KeyPress(_) | EventType::ButtonPress(_) | EventType::Wheel { .. } | EventType::MouseMove { .. }
        )
    }
}

impl ActivitySource for RdevSource {
    fn start(self: Box<Self>, sink: ActivitySink) -> Result<(), TrackerError> {
        let retry_delay = self.retry_delay;
        std::thread::Builder::new()
            .name("restwatch-input".to_string())
            .spawn(move || loop {
                let listener_sink = sink.clone();
                let result = listen(move |event: Event| {
                    // Stamped by the tracker clock; the event's own system time is not monotonic.
                    if Self::is_input(&event.event_type) {
                        listener_sink.observe_now();
                    }
                });
                match result {
                    Err(e) => {
                        tracing::warn!(error = ?e, "input listener failed, retrying");
                        std::thread::sleep(retry_delay);
                    }
                    // rdev::listen only returns on error.
                    Ok(()) => break,
                }
            })
            .map_err(|e| TrackerError::ActivitySource(e.to_string()))?;
        Ok(())
    }
}

/// Sending half of a [`ChannelSource`].
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    tx: mpsc::UnboundedSender<NaiveDateTime>,
}

impl ActivityFeed {
    /// Queues an activity notification. Returns `false` once the source has stopped.
    pub fn notify(&self, at: NaiveDateTime) -> bool {
        self.tx.send(at).is_ok()
    }
}

/// Synthetic source driven through an [`ActivityFeed`].
///
/// Requires a tokio runtime when started.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<NaiveDateTime>,
}

impl ChannelSource {
    pub fn new() -> (Self, ActivityFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, ActivityFeed { tx })
    }
}

impl ActivitySource for ChannelSource {
    fn start(self: Box<Self>, sink: ActivitySink) -> Result<(), TrackerError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| TrackerError::ActivitySource(e.to_string()))?;
        let mut rx = self.rx;
        handle.spawn(async move {
            while let Some(at) = rx.recv().await {
                sink.observe(at);
            }
        });
        Ok(())
    }
}
