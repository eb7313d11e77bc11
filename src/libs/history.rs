//! Append-only log of activity state transitions.
//!
//! The log keeps every transition exactly as it was observed. It never merges
//! or drops records; reports compact the trace on their own copy.
//!
//! Readers take a [`HistorySnapshot`], which shares the underlying buffer. An
//! append made while a snapshot is alive copies the buffer first, so the
//! snapshot keeps seeing the prefix it was taken from.

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Activity classification of a session at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityState {
    Active,
    Inactive,
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single observed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub timestamp: NaiveDateTime,
    pub state: ActivityState,
}

#[derive(Debug, Default)]
pub struct HistoryLog {
    records: RwLock<Arc<Vec<StateRecord>>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, timestamp: NaiveDateTime, state: ActivityState) {
        let mut records = self.records.write();
        Arc::make_mut(&mut records).push(StateRecord { timestamp, state });
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot(self.records.read().clone())
    }

    pub fn last(&self) -> Option<StateRecord> {
        self.records.read().last().copied()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Immutable view of the log at the moment it was taken.
#[derive(Debug, Clone)]
pub struct HistorySnapshot(Arc<Vec<StateRecord>>);

impl Deref for HistorySnapshot {
    type Target = [StateRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
