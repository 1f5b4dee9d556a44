//! Host summaries issued on behalf of an organizer.

use crate::catalog::Catalog;
use crate::types::ParticipantId;
use serde::Serialize;

/// The team publishing event listings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Organizer {
    name: String,
}

/// What one participant hosts, as reported by an organizer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    /// Organizer issuing the summary
    pub organizer: String,
    /// Number of events the participant hosts
    pub event_count: usize,
    /// Titles of those events, in catalog order
    pub events: Vec<String>,
}

impl Organizer {
    /// Creates an organizer
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Organizer name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Summarises the events hosted by `host_id`
    ///
    /// An unknown host yields an empty summary rather than an error.
    #[must_use]
    pub fn host_summary(&self, catalog: &Catalog, host_id: ParticipantId) -> HostSummary {
        let events: Vec<String> = catalog
            .events_hosted_by(host_id)
            .map(|event| event.title.clone())
            .collect();

        HostSummary {
            organizer: self.name.clone(),
            event_count: events.len(),
            events,
        }
    }
}
