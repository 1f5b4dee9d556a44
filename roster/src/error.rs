//! Error types for the roster.

use crate::types::{EventId, ParticipantId};
use thiserror::Error;

/// Why a registration request was rejected
///
/// The display strings are part of the outcome document callers receive and
/// must not change.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    /// An identifier was not a finite number
    #[error("Invalid user ID or event ID")]
    InvalidInput,

    /// No participant has the requested id
    #[error("User not found")]
    UserNotFound,

    /// No event has the requested id
    #[error("Event not found")]
    EventNotFound,

    /// The participant is already registered for the event
    #[error("Already registered for this event")]
    DuplicateRegistration,
}

/// Errors raised while building or loading a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two participants share an id
    #[error("participant {0} already exists")]
    DuplicateParticipant(ParticipantId),

    /// Two events share an id
    #[error("event {0} already exists")]
    DuplicateEvent(EventId),

    /// An event names a host that is not a participant
    #[error("event {event_id} is hosted by unknown participant {host_id}")]
    UnknownHost {
        /// Event being added
        event_id: EventId,
        /// Host it references
        host_id: ParticipantId,
    },

    /// A seeded registration references a missing participant
    #[error("registration references unknown participant {0}")]
    UnknownParticipant(ParticipantId),

    /// A seeded registration references a missing event
    #[error("registration references unknown event {0}")]
    UnknownEvent(EventId),

    /// A seeded registration repeats a (participant, event) pair
    #[error("participant {user_id} is registered for event {event_id} more than once")]
    DuplicateRegistration {
        /// Participant
        user_id: ParticipantId,
        /// Event
        event_id: EventId,
    },

    /// The catalog document could not be read
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document is not valid JSON for the expected shape
    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
}
