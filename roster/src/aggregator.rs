//! Read-only reports derived from a catalog.
//!
//! Nothing here mutates the catalog and nothing is cached: registration
//! counts are recomputed from the registrations on every call.

use crate::catalog::Catalog;
use crate::types::{Event, EventId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Capacity figures for one event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    /// Stated capacity
    pub capacity: u32,
    /// Number of registrations
    pub registered: u32,
    /// `capacity - registered`; negative when over capacity
    pub spots_left: i64,
    /// `registered / capacity` as a percentage, rounded half up
    ///
    /// `None` (serialized as `null`) when capacity is zero.
    pub full_percentage: Option<u64>,
}

impl ReportEntry {
    /// Computes the entry for an event with `registered` registrations
    #[must_use]
    pub fn new(capacity: u32, registered: u32) -> Self {
        Self {
            capacity,
            registered,
            spots_left: i64::from(capacity) - i64::from(registered),
            full_percentage: full_percentage(registered, capacity),
        }
    }
}

/// Report entries keyed by event id
pub type RegistrationReport = BTreeMap<EventId, ReportEntry>;

/// A report entry joined to its event title
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TitledReportEntry {
    /// Event title
    pub title: String,
    /// Capacity figures
    #[serde(flatten)]
    pub entry: ReportEntry,
}

/// An event together with how many spots it has left
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableEvent {
    /// Copy of the catalog event
    #[serde(flatten)]
    pub event: Event,
    /// `capacity - registered`
    pub spots_left: i64,
    /// `spots_left > 0`
    pub is_available: bool,
}

/// One registration joined to its participant and event
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetail {
    /// Participant's name
    pub participant_name: String,
    /// Participant's country code
    pub participant_country: String,
    /// Event title
    pub event_title: String,
    /// Day of the event
    pub event_date: NaiveDate,
    /// UTC day the registration was made
    pub registration_date: NaiveDate,
}

/// `round_half_up(registered / capacity * 100)`, or `None` for zero capacity
///
/// Integer arithmetic, so there is no float rounding at the `.5` boundary.
#[must_use]
pub fn full_percentage(registered: u32, capacity: u32) -> Option<u64> {
    if capacity == 0 {
        return None;
    }
    let capacity = u64::from(capacity);
    Some((200 * u64::from(registered) + capacity) / (2 * capacity))
}

/// Number of registrations per event, counted in one pass
///
/// Events without registrations are absent from the map.
#[must_use]
pub fn registration_counts(catalog: &Catalog) -> BTreeMap<EventId, u32> {
    catalog
        .registrations()
        .iter()
        .fold(BTreeMap::new(), |mut counts, registration| {
            *counts.entry(registration.event_id).or_insert(0) += 1;
            counts
        })
}

/// Builds a report entry for every event in the catalog
#[must_use]
pub fn build_registration_report(catalog: &Catalog) -> RegistrationReport {
    let counts = registration_counts(catalog);
    catalog
        .events()
        .iter()
        .map(|event| {
            let registered = counts.get(&event.id).copied().unwrap_or(0);
            (event.id, ReportEntry::new(event.capacity.value(), registered))
        })
        .collect()
}

/// The registration report joined to event titles, in catalog order
#[must_use]
pub fn titled_report(catalog: &Catalog) -> Vec<TitledReportEntry> {
    let report = build_registration_report(catalog);
    catalog
        .events()
        .iter()
        .filter_map(|event| {
            report.get(&event.id).map(|entry| TitledReportEntry {
                title: event.title.clone(),
                entry: *entry,
            })
        })
        .collect()
}

/// Events with at least one spot left, most spots first
///
/// Ties keep catalog order.
#[must_use]
pub fn list_available_events(catalog: &Catalog) -> Vec<AvailableEvent> {
    let counts = registration_counts(catalog);
    let mut available: Vec<AvailableEvent> = catalog
        .events()
        .iter()
        .map(|event| {
            let registered = counts.get(&event.id).copied().unwrap_or(0);
            let spots_left = i64::from(event.capacity.value()) - i64::from(registered);
            AvailableEvent {
                event: event.clone(),
                spots_left,
                is_available: spots_left > 0,
            }
        })
        .filter(|event| event.is_available)
        .collect();

    // sort_by is stable
    available.sort_by(|a, b| b.spots_left.cmp(&a.spots_left));
    available
}

/// Sum of every event's capacity
#[must_use]
pub fn total_capacity(catalog: &Catalog) -> u64 {
    catalog
        .events()
        .iter()
        .map(|event| u64::from(event.capacity.value()))
        .sum()
}

/// Names of the participants registered for an event, in registration order
#[must_use]
pub fn participant_names_for(catalog: &Catalog, event_id: EventId) -> Vec<&str> {
    catalog
        .registrations_for(event_id)
        .filter_map(|registration| catalog.participant(registration.user_id))
        .map(|participant| participant.name.as_str())
        .collect()
}

/// Every registration joined to its participant and event
///
/// Registrations whose participant, event, or timestamp cannot be resolved
/// are skipped.
#[must_use]
pub fn registration_details(catalog: &Catalog) -> Vec<RegistrationDetail> {
    catalog
        .registrations()
        .iter()
        .filter_map(|registration| {
            let participant = catalog.participant(registration.user_id)?;
            let event = catalog.event(registration.event_id)?;
            let registered_at = registration.registered_at()?;
            Some(RegistrationDetail {
                participant_name: participant.name.clone(),
                participant_country: participant.country.to_string(),
                event_title: event.title.clone(),
                event_date: event.date,
                registration_date: registered_at.date_naive(),
            })
        })
        .collect()
}
