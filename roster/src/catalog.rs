//! In-memory catalog of participants, events, and registrations.
//!
//! Participants and events are reference data: they are added once and never
//! change. Registrations are append-only. Every write checks referential
//! integrity at the time it happens; nothing re-checks it later.

use crate::error::CatalogError;
use crate::types::{Event, EventId, Participant, ParticipantId, Registration};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized shape of a catalog
///
/// This is the on-disk format. It carries no guarantees until it is turned
/// into a [`Catalog`] with [`Catalog::from_document`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Participants in insertion order
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Events in insertion order
    #[serde(default)]
    pub events: Vec<Event>,
    /// Registrations in the order they were made
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

/// Validated collections the registrar and aggregator work on
///
/// Iteration order is insertion order throughout, which is what keeps
/// sorted reports stable on ties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    participants: Vec<Participant>,
    events: Vec<Event>,
    registrations: Vec<Registration>,
}

impl Catalog {
    /// Creates an empty catalog
    #[must_use]
    pub const fn new() -> Self {
        Self {
            participants: Vec::new(),
            events: Vec::new(),
            registrations: Vec::new(),
        }
    }

    /// Builds a catalog from a document, checking every invariant
    ///
    /// Participants are added first, then events, then registrations, so a
    /// document may list them in any order within each collection.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found: duplicate ids, an unknown
    /// host, a registration with dangling references, or a repeated pair.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for participant in document.participants {
            catalog.add_participant(participant)?;
        }
        for event in document.events {
            catalog.add_event(event)?;
        }
        for registration in document.registrations {
            catalog.seed_registration(registration)?;
        }
        Ok(catalog)
    }

    /// Parses and validates a JSON catalog document
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed input, or any error from
    /// [`Catalog::from_document`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Reads and validates a JSON catalog document from disk
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, or any error
    /// from [`Catalog::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            participants = catalog.participants.len(),
            events = catalog.events.len(),
            registrations = catalog.registrations.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Adds a participant
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateParticipant`] if the id is taken.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), CatalogError> {
        if self.participant(participant.id).is_some() {
            return Err(CatalogError::DuplicateParticipant(participant.id));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Adds an event hosted by an existing participant
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateEvent`] if the id is taken, or
    /// [`CatalogError::UnknownHost`] if the host is not a participant.
    pub fn add_event(&mut self, event: Event) -> Result<(), CatalogError> {
        if self.event(event.id).is_some() {
            return Err(CatalogError::DuplicateEvent(event.id));
        }
        if self.participant(event.host_id).is_none() {
            return Err(CatalogError::UnknownHost {
                event_id: event.id,
                host_id: event.host_id,
            });
        }
        self.events.push(event);
        Ok(())
    }

    /// Adds a historical registration, keeping its original timestamp
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownParticipant`] or
    /// [`CatalogError::UnknownEvent`] for dangling references, and
    /// [`CatalogError::DuplicateRegistration`] for a repeated pair.
    pub fn seed_registration(&mut self, registration: Registration) -> Result<(), CatalogError> {
        let Registration {
            user_id, event_id, ..
        } = registration;

        if self.participant(user_id).is_none() {
            return Err(CatalogError::UnknownParticipant(user_id));
        }
        if self.event(event_id).is_none() {
            return Err(CatalogError::UnknownEvent(event_id));
        }
        if self.is_registered(user_id, event_id) {
            return Err(CatalogError::DuplicateRegistration { user_id, event_id });
        }
        self.registrations.push(registration);
        Ok(())
    }

    /// Appends a registration the caller has already validated
    pub(crate) fn append_registration(&mut self, registration: Registration) {
        self.registrations.push(registration);
    }

    /// All participants in insertion order
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// All events in insertion order
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// All registrations in the order they were made
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Looks up a participant by id
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Looks up an event by id
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Returns `true` if the participant is registered for the event
    #[must_use]
    pub fn is_registered(&self, user_id: ParticipantId, event_id: EventId) -> bool {
        self.registrations.iter().any(|r| r.links(user_id, event_id))
    }

    /// Registrations for one event, in the order they were made
    pub fn registrations_for(&self, event_id: EventId) -> impl Iterator<Item = &Registration> {
        self.registrations
            .iter()
            .filter(move |r| r.event_id == event_id)
    }

    /// Events hosted by one participant, in insertion order
    pub fn events_hosted_by(&self, host_id: ParticipantId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.host_id == host_id)
    }

    /// Copies the catalog back into its serialized shape
    #[must_use]
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            participants: self.participants.clone(),
            events: self.events.clone(),
            registrations: self.registrations.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{event, participant, sample_catalog};
    use chrono::DateTime;

    #[test]
    fn sample_document_loads() {
        let catalog = sample_catalog();
        assert_eq!(catalog.participants().len(), 6);
        assert_eq!(catalog.events().len(), 4);
        assert_eq!(catalog.registrations().len(), 9);
    }

    #[test]
    fn lookups_find_by_id() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.participant(ParticipantId::new(3)).unwrap().name,
            "Fatima Al-Hassan"
        );
        assert_eq!(
            catalog.event(EventId::new(104)).unwrap().title,
            "TypeScript Deep Dive"
        );
        assert!(catalog.participant(ParticipantId::new(99)).is_none());
        assert!(catalog.event(EventId::new(999)).is_none());
    }

    #[test]
    fn registrations_for_keeps_insertion_order() {
        let catalog = sample_catalog();
        let users: Vec<u32> = catalog
            .registrations_for(EventId::new(101))
            .map(|r| r.user_id.value())
            .collect();
        assert_eq!(users, vec![1, 2, 4]);
    }

    #[test]
    fn duplicate_participant_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_participant(participant(1, "Ada")).unwrap();
        let err = catalog.add_participant(participant(1, "Grace")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateParticipant(id) if id.value() == 1));
    }

    #[test]
    fn event_requires_known_host() {
        let mut catalog = Catalog::new();
        let err = catalog.add_event(event(101, 7, 10)).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownHost { host_id, .. } if host_id.value() == 7));
    }

    #[test]
    fn duplicate_event_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_participant(participant(1, "Ada")).unwrap();
        catalog.add_event(event(101, 1, 10)).unwrap();
        let err = catalog.add_event(event(101, 1, 20)).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEvent(id) if id.value() == 101));
    }

    #[test]
    fn seeded_registrations_are_checked() {
        let mut catalog = Catalog::new();
        catalog.add_participant(participant(1, "Ada")).unwrap();
        catalog.add_event(event(101, 1, 10)).unwrap();
        let at = DateTime::from_timestamp_millis(0).unwrap();

        let dangling_user = Registration::new(ParticipantId::new(2), EventId::new(101), at);
        assert!(matches!(
            catalog.seed_registration(dangling_user),
            Err(CatalogError::UnknownParticipant(_))
        ));

        let dangling_event = Registration::new(ParticipantId::new(1), EventId::new(102), at);
        assert!(matches!(
            catalog.seed_registration(dangling_event),
            Err(CatalogError::UnknownEvent(_))
        ));

        let ok = Registration::new(ParticipantId::new(1), EventId::new(101), at);
        catalog.seed_registration(ok.clone()).unwrap();
        assert!(matches!(
            catalog.seed_registration(ok),
            Err(CatalogError::DuplicateRegistration { .. })
        ));
        assert_eq!(catalog.registrations().len(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Catalog::load("/nonexistent/roster/catalog.json"),
            Err(CatalogError::Io(_))
        ));
    }

    #[test]
    fn document_round_trip_preserves_catalog() {
        let catalog = sample_catalog();
        let rebuilt = Catalog::from_document(catalog.to_document()).unwrap();
        assert_eq!(rebuilt, catalog);
    }
}
