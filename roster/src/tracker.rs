//! Attendance statistics kept alongside the catalog.
//!
//! Both trackers keep their counts private; callers can only change them
//! through the methods below.

use crate::types::EventId;
use serde::Serialize;
use std::collections::BTreeMap;

/// View and registration counts for one event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    /// Times the event was viewed
    pub views: u64,
    /// Registrations recorded through the tracker
    pub registrations: u64,
}

/// Per-event view and registration counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventTracker {
    stats: BTreeMap<EventId, EventStats>,
}

impl EventTracker {
    /// Creates a tracker with no recorded activity
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stats: BTreeMap::new(),
        }
    }

    /// Counts one view of an event
    pub fn track_view(&mut self, event_id: EventId) {
        self.stats.entry(event_id).or_default().views += 1;
    }

    /// Counts one registration for an event
    pub fn track_registration(&mut self, event_id: EventId) {
        self.stats.entry(event_id).or_default().registrations += 1;
    }

    /// Stats for one event, or `None` if it was never viewed or registered for
    #[must_use]
    pub fn stats(&self, event_id: EventId) -> Option<EventStats> {
        self.stats.get(&event_id).copied()
    }

    /// Stats for every event with recorded activity
    #[must_use]
    pub const fn all_stats(&self) -> &BTreeMap<EventId, EventStats> {
        &self.stats
    }
}

/// Number of registrations made during the current session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistrationCounter {
    count: u64,
}

impl RegistrationCounter {
    /// Creates a counter at zero
    #[must_use]
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Counts one registration and returns the new total
    pub const fn record(&mut self) -> u64 {
        self.count += 1;
        self.count
    }

    /// Current total
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Starts the count over
    pub const fn reset(&mut self) {
        self.count = 0;
    }
}
