//! Domain types for the event roster.
//!
//! Participants host and attend events; registrations link the two. Field
//! names serialize in camelCase (`userId`, `hostId`, `joinedAt`) so catalog
//! documents and reports read the same as the data they were built from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u32);

impl ParticipantId {
    /// Creates a `ParticipantId` from its numeric value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    /// Creates an `EventId` from its numeric value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// Seating capacity of an event
///
/// A soft limit: registrations may exceed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(pub u32);

impl Capacity {
    /// Creates a new `Capacity`
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the capacity value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Country code was not two uppercase ASCII letters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid country code {0:?}: expected two uppercase letters")]
pub struct InvalidCountryCode(pub String);

/// Two-letter country code (ISO 3166-1 alpha-2 style)
///
/// Only the shape is checked, not membership in the ISO list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Returns the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = InvalidCountryCode;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        if code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(InvalidCountryCode(code))
        }
    }
}

impl TryFrom<&str> for CountryCode {
    type Error = InvalidCountryCode;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        Self::try_from(code.to_string())
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A hacker registered on the platform
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Participant identifier
    pub id: ParticipantId,
    /// Full name
    pub name: String,
    /// Country of residence
    pub country: CountryCode,
    /// Day the participant joined
    pub joined_at: NaiveDate,
}

/// A hosted session participants can attend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier
    pub id: EventId,
    /// Event title
    pub title: String,
    /// Participant hosting the event
    pub host_id: ParticipantId,
    /// Day the event takes place
    pub date: NaiveDate,
    /// Maximum intended attendance
    pub capacity: Capacity,
}

/// A timestamped link between one participant and one event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Registered participant
    pub user_id: ParticipantId,
    /// Event registered for
    pub event_id: EventId,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Registration {
    /// Creates a registration stamped at `at`
    #[must_use]
    pub fn new(user_id: ParticipantId, event_id: EventId, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            event_id,
            timestamp: at.timestamp_millis(),
        }
    }

    /// Registration time, if the timestamp is representable
    #[must_use]
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Returns `true` if this registration links `user_id` to `event_id`
    #[must_use]
    pub fn links(&self, user_id: ParticipantId, event_id: EventId) -> bool {
        self.user_id == user_id && self.event_id == event_id
    }
}
