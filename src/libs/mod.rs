//! Core library modules for restwatch.
//!
//! ## Features
//!
//! - **Tracking Engine**: session state machine, break timer, history log and
//!   the [`tracker::Tracker`] that serializes them
//! - **Collaborators**: clocks, deferred scheduling and input observation sources
//! - **Reporting**: compaction into intervals, formatting, terminal views and
//!   file export
//! - **Infrastructure**: configuration, data storage and user-facing messages
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use restwatch::libs::clock::ManualClock;
//! use restwatch::libs::config::TrackerConfig;
//! use restwatch::libs::scheduler::ManualScheduler;
//! use restwatch::libs::tracker::Tracker;
//! use std::sync::Arc;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let clock = Arc::new(ManualClock::new(start));
//! let tracker = Tracker::new(&TrackerConfig::default(), clock.clone(), Arc::new(ManualScheduler::new())).unwrap();
//!
//! tracker.start();
//! clock.advance(Duration::milliseconds(100));
//! tracker.tick();
//!
//! assert_eq!(tracker.status().active_duration, Duration::milliseconds(100));
//! ```

pub mod activity;
pub mod breaks;
pub mod clock;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod formatter;
pub mod history;
pub mod messages;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod tracker;
pub mod view;
